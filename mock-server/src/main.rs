use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "8001".to_string());
    let page_size = std::env::var("PAGE_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(mock_server::DEFAULT_PAGE_SIZE);

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("admin API listening on {addr} (page size {page_size})");
    mock_server::serve(listener, mock_server::app_with_page_size(page_size)).await
}
