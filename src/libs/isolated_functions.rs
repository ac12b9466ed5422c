//! Message helpers
//!
//! The capabilities forward to the `log` facade; the plain functions are used
//! directly by Rust callers such as the patch engine.

use crate::error::{Error, Result};
use crate::output::status_marker;
use crate::registry::{Registry, Visibility};
use crate::session::Session;

pub const IDENTIFIER: &str = "isolated-functions";

pub fn register(registry: &mut Registry) -> Result<()> {
    registry.define(IDENTIFIER, "einfo", Visibility::Public, |_, s, args| {
        einfo(s, &args.join(" "));
        Ok(0)
    })?;
    registry.define(IDENTIFIER, "ewarn", Visibility::Public, |_, s, args| {
        ewarn(s, &args.join(" "));
        Ok(0)
    })?;
    registry.define(IDENTIFIER, "eerror", Visibility::Public, |_, s, args| {
        eerror(s, &args.join(" "));
        Ok(0)
    })?;
    registry.define(IDENTIFIER, "ebegin", Visibility::Public, |_, s, args| {
        ebegin(s, &args.join(" "));
        Ok(0)
    })?;
    registry.define(IDENTIFIER, "eend", Visibility::Public, |_, s, args| {
        let status = match args.first() {
            Some(value) => value.parse::<i32>().map_err(|_| {
                Error::usage("eend", format!("invalid status: {}", value))
            })?,
            None => 0,
        };
        let message = args.get(1..).map(|rest| rest.join(" "));
        eend(s, status, message.as_deref().filter(|m| !m.is_empty()));
        Ok(status)
    })?;
    registry.define(IDENTIFIER, "__elog_base", Visibility::Internal, elog_base)?;
    Ok(())
}

/// `__elog_base <INFO|WARN|ERROR> message...`
fn elog_base(_: &Registry, session: &mut Session, args: &[String]) -> Result<i32> {
    let Some((level, rest)) = args.split_first() else {
        return Err(Error::usage("__elog_base", "missing log level"));
    };
    let message = rest.join(" ");
    match level.as_str() {
        "INFO" | "LOG" => einfo(session, &message),
        "WARN" => ewarn(session, &message),
        "ERROR" => eerror(session, &message),
        other => {
            return Err(Error::usage(
                "__elog_base",
                format!("invalid log level: {}", other),
            ))
        }
    }
    Ok(0)
}

pub fn einfo(_session: &Session, message: &str) {
    log::info!("* {}", message);
}

pub fn ewarn(_session: &Session, message: &str) {
    log::warn!("* {}", message);
}

pub fn eerror(_session: &Session, message: &str) {
    log::error!("* {}", message);
}

pub fn ebegin(_session: &Session, message: &str) {
    log::info!("* {}", message);
}

/// Close an `ebegin`; a non-zero status also reports `message` as an error.
pub fn eend(session: &Session, status: i32, message: Option<&str>) {
    let marker = status_marker(&session.output, status == 0);
    if status == 0 {
        log::info!("{}", marker);
        return;
    }
    if let Some(message) = message {
        for line in message.lines().filter(|l| !l.trim().is_empty()) {
            eerror(session, line);
        }
    }
    log::error!("{}", marker);
}
