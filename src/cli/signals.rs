//! Toggle and shutdown input for the interactive session

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Session input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    /// Enter pressed: start or stop recording
    Toggle,
    /// SIGINT/SIGTERM: stop any recording, then exit
    Shutdown,
}

/// Turns terminal input and OS signals into [`SessionSignal`]s.
///
/// Each source runs in its own task and feeds one channel, so the session
/// loop only ever waits on [`recv`](Self::recv).
pub struct SessionSignalHandler {
    receiver: mpsc::Receiver<SessionSignal>,
}

impl SessionSignalHandler {
    /// Listen for shutdown signals only
    pub fn new() -> Result<(Self, mpsc::Sender<SessionSignal>), std::io::Error> {
        let (tx, rx) = mpsc::channel(10);
        spawn_shutdown_listeners(tx.clone())?;
        Ok((Self { receiver: rx }, tx))
    }

    /// Listen for shutdown signals and treat each stdin line as a toggle
    pub fn with_stdin() -> Result<Self, std::io::Error> {
        let (handler, tx) = Self::new()?;
        tokio::spawn(forward_lines(BufReader::new(tokio::io::stdin()), tx));
        Ok(handler)
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<SessionSignal> {
        self.receiver.recv().await
    }
}

/// Send a toggle for every line read. End of input counts as shutdown.
async fn forward_lines<R>(reader: R, tx: mpsc::Sender<SessionSignal>)
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(_)) => {
                if tx.send(SessionSignal::Toggle).await.is_err() {
                    return;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                break;
            }
        }
    }
    tracing::debug!("stdin closed");
    let _ = tx.send(SessionSignal::Shutdown).await;
}

#[cfg(unix)]
fn spawn_shutdown_listeners(tx: mpsc::Sender<SessionSignal>) -> Result<(), std::io::Error> {
    use tokio::signal::unix::{signal, SignalKind};

    let tx_int = tx.clone();
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::spawn(async move {
        while sigint.recv().await.is_some() {
            tracing::debug!("received SIGINT");
            if tx_int.send(SessionSignal::Shutdown).await.is_err() {
                break;
            }
        }
    });

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::spawn(async move {
        sigterm.recv().await;
        tracing::debug!("received SIGTERM");
        let _ = tx.send(SessionSignal::Shutdown).await;
    });

    Ok(())
}

#[cfg(not(unix))]
fn spawn_shutdown_listeners(tx: mpsc::Sender<SessionSignal>) -> Result<(), std::io::Error> {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("received Ctrl+C");
            if tx.send(SessionSignal::Shutdown).await.is_err() {
                break;
            }
        }
    });
    Ok(())
}
