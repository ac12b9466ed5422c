//! `eapply` and `eapply_user`

use crate::error::{Error, Result};
use crate::libs::isolated_functions::einfo;
use crate::patch::{self, PatchRequest};
use crate::registry::{Registry, Visibility};
use crate::session::Session;
use crate::user_patches;

pub const IDENTIFIER: &str = "ebuild-default-functions";

pub fn register(registry: &mut Registry) -> Result<()> {
    registry.define(IDENTIFIER, "eapply", Visibility::Public, |_, session, args| {
        Ok(patch::eapply(session, args)?.status())
    })?;
    registry.define(IDENTIFIER, "eapply_user", Visibility::Public, eapply_user)?;
    registry.define(
        IDENTIFIER,
        "__eapply_resolve",
        Visibility::Internal,
        eapply_resolve,
    )?;
    Ok(())
}

/// Applies the session's user patches. Takes no arguments.
fn eapply_user(_: &Registry, session: &mut Session, args: &[String]) -> Result<i32> {
    if !args.is_empty() {
        return Err(Error::usage("eapply_user", "takes no arguments"));
    }
    let patches = session.user_patches.clone();
    Ok(user_patches::apply_user_patches_once(session, &patches)?.status())
}

/// Logs the patch files `eapply` would apply for the same arguments.
fn eapply_resolve(_: &Registry, session: &mut Session, args: &[String]) -> Result<i32> {
    let request = PatchRequest::classify(args)?;
    for patch in request.resolve(session)? {
        einfo(session, &patch.display().to_string());
    }
    Ok(0)
}
