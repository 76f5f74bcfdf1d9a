//! Static-HTML renderer backed by plain HTTP fetches.
//!
//! No JavaScript runs, so nothing is captured and no screenshot is taken;
//! the dismissal/scroll options in [`RenderConfig`] only apply to
//! browser-backed renderers. Good enough for server-rendered ad pages and
//! for exercising the rest of the pipeline.

use std::time::Duration;

use super::{RenderConfig, RenderError, RenderedPage, Renderer};

const BROWSER_FALLBACK_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const FETCH_ATTEMPTS: usize = 3;
const FETCH_BACKOFF_MS: [u64; 3] = [0, 300, 900];

/// [`Renderer`] that issues a plain GET for the page.
#[derive(Debug, Clone, Default)]
pub struct HttpRenderer {
    client: reqwest::Client,
}

impl HttpRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the HTML body of `url`, trying the configured user-agent first
    /// and then a browser-like fallback UA. Some retail sites hide the ad
    /// grid from non-browser user-agents.
    async fn fetch_html(&self, url: &str, config: &RenderConfig) -> Result<String, RenderError> {
        let mut last_error: Option<RenderError> = None;

        for attempt in 0..FETCH_ATTEMPTS {
            if let Some(delay_ms) = FETCH_BACKOFF_MS.get(attempt).copied() {
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }

            let mut user_agents = vec![config.user_agent.as_str()];
            if config.user_agent != BROWSER_FALLBACK_UA {
                user_agents.push(BROWSER_FALLBACK_UA);
            }

            for ua in user_agents {
                let response = match self
                    .client
                    .get(url)
                    .timeout(Duration::from_secs(config.timeout_secs))
                    .header(reqwest::header::USER_AGENT, ua)
                    .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
                    .send()
                    .await
                {
                    Ok(response) => response,
                    Err(err) => {
                        last_error = Some(RenderError::Http {
                            url: url.to_owned(),
                            source: err,
                        });
                        continue;
                    }
                };

                let status = response.status();
                if !status.is_success() {
                    last_error = Some(RenderError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_owned(),
                    });
                    continue;
                }

                match response.text().await {
                    Ok(body) if is_usable_html(&body) => return Ok(body),
                    Ok(_) => {
                        tracing::debug!(url, ua, attempt, "fetched body not usable; retrying");
                    }
                    Err(err) => {
                        last_error = Some(RenderError::Http {
                            url: url.to_owned(),
                            source: err,
                        });
                    }
                }
            }
        }

        Err(last_error.unwrap_or(RenderError::AllAttemptsFailed {
            url: url.to_owned(),
            attempts: FETCH_ATTEMPTS,
        }))
    }
}

#[async_trait::async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &str, config: &RenderConfig) -> Result<RenderedPage, RenderError> {
        let html = self.fetch_html(url, config).await?;
        Ok(RenderedPage {
            html,
            captured: vec![],
            screenshot: None,
        })
    }
}

fn is_usable_html(body: &str) -> bool {
    let trimmed = body.trim();
    !trimmed.is_empty() && !looks_like_bot_challenge(trimmed)
}

fn looks_like_bot_challenge(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    let has_cloudflare_banner = lowered.contains("attention required! | cloudflare");
    let has_challenge_platform = lowered.contains("/cdn-cgi/challenge-platform/");
    let has_just_a_moment = lowered.contains("just a moment...");
    let has_cookie_gate = lowered.contains("please enable cookies");

    has_cloudflare_banner || has_challenge_platform || (has_just_a_moment && has_cookie_gate)
}
