//! `die`, `nonfatal` and the helper failure path
//!
//! `exit` is registered here as well but the bootstrap bans it, so recipes
//! end a build step through `die` instead of tearing down the process.

use crate::error::{Error, Result};
use crate::libs::isolated_functions::eerror;
use crate::registry::{Registry, Visibility};
use crate::session::Session;

pub const IDENTIFIER: &str = "exit-handling";

pub fn register(registry: &mut Registry) -> Result<()> {
    registry.define(IDENTIFIER, "die", Visibility::Public, |_, _, args| {
        Err(Error::Die {
            message: args.join(" "),
        })
    })?;
    registry.define(IDENTIFIER, "exit", Visibility::Public, |_, _, args| {
        let status = match args.first() {
            Some(value) => value
                .parse::<i32>()
                .map_err(|_| Error::usage("exit", format!("invalid status: {}", value)))?,
            None => 0,
        };
        std::process::exit(status)
    })?;
    registry.define(IDENTIFIER, "nonfatal", Visibility::Public, nonfatal)?;
    registry.define(
        IDENTIFIER,
        "__helper_failed",
        Visibility::Internal,
        helper_failed,
    )?;
    Ok(())
}

/// `nonfatal <capability> [args...]`: run a capability with failures demoted
/// to a returned status.
fn nonfatal(registry: &Registry, session: &mut Session, args: &[String]) -> Result<i32> {
    let Some((name, rest)) = args.split_first() else {
        return Err(Error::usage("nonfatal", "no command specified"));
    };
    let previous = session.nonfatal;
    session.nonfatal = true;
    let result = registry.invoke(name, session, rest);
    session.nonfatal = previous;
    result
}

/// `__helper_failed <helper> [status]`: dies unless running non-fatally.
fn helper_failed(_: &Registry, session: &mut Session, args: &[String]) -> Result<i32> {
    let helper = args.first().map(String::as_str).unwrap_or("helper");
    let status = args
        .get(1)
        .and_then(|s| s.parse::<i32>().ok())
        .filter(|s| *s != 0)
        .unwrap_or(1);
    let message = format!("{} failed with status {}", helper, status);
    if session.nonfatal {
        eerror(session, &message);
        return Ok(status);
    }
    Err(Error::Die { message })
}
