//! CLI runtime

use std::future::Future;
use tokio::runtime::Builder;

/// Drive one async command to completion on a current-thread runtime.
pub fn block_on<F: Future>(future: F) -> crate::Result<F::Output> {
    let runtime = Builder::new_current_thread().enable_all().build()?;
    Ok(runtime.block_on(future))
}
