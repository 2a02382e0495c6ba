#[tokio::main]
async fn main() {
    vote_intake::start_server().await;
}
