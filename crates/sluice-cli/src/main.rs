use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use sluice_core::{BoxError, FailureRecord, Handler, InMemoryQueue, Observer, Queue};

#[derive(Debug, Deserialize)]
struct Greeting {
    name: String,
}

/// Decodes a JSON payload and produces a greeting line.
struct GreetHandler;

#[async_trait]
impl Handler<Vec<u8>, String> for GreetHandler {
    async fn handle(&self, payload: Vec<u8>) -> Result<String, BoxError> {
        let greeting: Greeting = serde_json::from_slice(&payload)?;
        Ok(format!("Hello, {}!", greeting.name))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // (A) queues: input, output, exceptions
    let input: Arc<InMemoryQueue<Vec<u8>>> = Arc::new(InMemoryQueue::new());
    let output: Arc<InMemoryQueue<String>> = Arc::new(InMemoryQueue::new());
    let exceptions: Arc<InMemoryQueue<FailureRecord<Vec<u8>>>> = Arc::new(InMemoryQueue::new());

    // (B) one observer draining the input
    let mut observer = Observer::new(
        input.clone() as Arc<dyn Queue<Vec<u8>>>,
        Arc::new(GreetHandler),
    )
    .with_output(output.clone() as Arc<dyn Queue<String>>)
    .with_exceptions(exceptions.clone() as Arc<dyn Queue<FailureRecord<Vec<u8>>>>);

    let _loop_task = observer.start().expect("fresh observer starts");
    info!(id = %observer.id(), status = ?observer.status(), "observer running");

    // (C) enqueue payloads; the second one is poisoned on purpose
    input.put(
        serde_json::to_vec(&serde_json::json!({ "name": "sluice" })).expect("valid payload"),
    );
    input.put(b"{ not json".to_vec());
    input.put(serde_json::to_vec(&serde_json::json!({ "name": "world" })).expect("valid payload"));

    // (D) wait until every item has been acknowledged
    input.join().await;

    while let Some(greeting) = output.get().await {
        info!(%greeting, "handled");
    }
    while let Some(record) = exceptions.get().await {
        info!(error = %record.error, chain = ?record.chain, "recovered failure");
    }

    observer.stop().expect("observer is running");
    info!(status = ?observer.status(), "done");
}
