use std::sync::Arc;

use mock_server::ServiceState;
use tokio::{net::TcpListener, sync::RwLock};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let token = std::env::var("ADMIN_TOKEN").unwrap_or_else(|_| "admin".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");
    mock_server::run(listener, Arc::new(RwLock::new(ServiceState::new(&token)))).await
}
