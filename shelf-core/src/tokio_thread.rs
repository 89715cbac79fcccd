use std::pin::Pin;

type Task = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A multi-threaded tokio runtime driven from its own OS thread, so the UI thread
/// never blocks on network I/O. Tasks are handed over through a channel.
pub struct TokioThread {
    tokio: TokioHandle,
    _tokio_thread_handle: std::thread::JoinHandle<()>,
}

pub struct TokioHandle(tokio::sync::mpsc::Sender<Task>);
impl TokioHandle {
    /// Must not be called from within the runtime itself.
    pub fn spawn(&self, task: impl Future<Output = ()> + Send + 'static) {
        if self.0.blocking_send(Box::pin(task)).is_err() {
            tracing::error!("tokio thread has shut down, dropping task");
        }
    }
}

impl TokioThread {
    pub fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (tokio_tx, mut tokio_rx) = tokio::sync::mpsc::channel::<Task>(16);
        let tokio = TokioHandle(tokio_tx);

        let tokio_thread_handle = std::thread::Builder::new()
            .name("shelf-tokio".to_string())
            .spawn(move || {
                runtime.block_on(async {
                    while let Some(task) = tokio_rx.recv().await {
                        tokio::spawn(task);
                    }
                });
            })?;

        Ok(Self {
            tokio,
            _tokio_thread_handle: tokio_thread_handle,
        })
    }

    pub fn spawn(&self, task: impl Future<Output = ()> + Send + 'static) {
        self.tokio.spawn(task);
    }
}
