use std::time::Duration;

use retryable_http::{RetryingExecutor, StatusRange};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://httpbin.org/status/503,200".to_owned());

    let executor = RetryingExecutor::builder()
        .max_attempts(4)
        .delay(Duration::from_millis(500))
        .check(StatusRange::new(200..=204))
        .build()?;

    let request = executor.transport().get(&url).build()?;

    match executor.execute(&request).await {
        Ok(response) => println!("accepted: {}", response.status()),
        Err(failure) => {
            println!("gave up after {} attempt(s): {}", failure.attempts(), failure.error());
            if let Some(response) = failure.into_response() {
                println!("final body: {}", response.text().await?);
            }
        }
    }

    Ok(())
}
