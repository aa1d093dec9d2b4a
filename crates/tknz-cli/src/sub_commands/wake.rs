use anyhow::{bail, Result};
use url::Url;

pub async fn wake(backend: &Url) -> Result<()> {
    let url = backend.join("gm")?;
    let response = reqwest::get(url).await?;

    if !response.status().is_success() {
        bail!("backend responded with {}", response.status());
    }

    println!("Backend is awake");
    Ok(())
}
