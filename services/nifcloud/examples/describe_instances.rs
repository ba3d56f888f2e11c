use anyhow::Result;
use nifsign_core::{Context, OsEnv, RequestOptions};
use nifsign_file_read_tokio::TokioFileRead;
use nifsign_http_send_reqwest::ReqwestHttpSend;
use nifsign_nifcloud::{Client, Config};
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Region from the first argument, credentials from ~/.nifcloud.yml or env.
    let region = env::args().nth(1).unwrap_or_else(|| "jp-east-1".to_string());

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let client = Client::new(ctx, Config::new("computing").with_region_name(&region));

    let resp = client
        .request_with_options(
            http::Method::GET,
            Some("DescribeInstances"),
            [("Action", "DescribeInstances"), ("Version", "1")],
            Default::default(),
            &RequestOptions::new().with_timeout(Duration::from_secs(30)),
        )
        .await?;

    println!("Response status: {}", resp.status());
    println!("{}", String::from_utf8_lossy(resp.body()));
    Ok(())
}
