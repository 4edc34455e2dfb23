use log::error;
use sirstream::render::SharedView;
use sirstream::{HttpConnector, SessionConfig, SessionController, SessionHandle};
use std::thread;
use tokio::runtime::Builder;

/// Runs the session actor on its own thread so the window never waits on the stream.
pub fn spawn_session(config: &SessionConfig, view: &SharedView) -> Result<SessionHandle, String> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("failed to build runtime: {err}"))?;
    let connector = HttpConnector::with_runtime(config, runtime.handle().clone())
        .map_err(|err| err.to_string())?;
    let controller = SessionController::from_config(config, connector, view.sink())
        .map_err(|err| err.to_string())?;
    let (handle, commands) = SessionHandle::channel();

    thread::Builder::new()
        .name("sirstream-session".into())
        .spawn(move || {
            runtime.block_on(controller.run(commands));
        })
        .map_err(|err| {
            error!("session thread failed to start: {}", err);
            err.to_string()
        })?;

    Ok(handle)
}
