use tokio::signal;
use tracing::info;

pub(crate) async fn shutdown_signal() {
    let ctrl_c_signal = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {:#?}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate_signal = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {:#?}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate_signal = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c_signal => info!("Received Ctrl+C, shutting down smabridge"),
        _ = terminate_signal => info!("Received SIGTERM, shutting down smabridge"),
    };
}
