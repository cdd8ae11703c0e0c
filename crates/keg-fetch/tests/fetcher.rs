//! Retry, redirect and status behavior of `Fetcher` against a scripted client.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream;
use keg_fetch::{
    CancellationToken, FetchError, FetchOptions, FetchPhase, Fetcher, HttpClient, HttpResponse,
    TransportError,
};
use url::Url;

enum Step {
    Respond {
        status:   u16,
        location: Option<&'static str>,
        body:     &'static [u8],
    },
    Fail(TransportError),
    /// Never answers.
    Hang,
    /// Sends headers and the first chunk, then goes silent.
    StallBody(&'static [u8]),
}

fn ok(body: &'static [u8]) -> Step {
    Step::Respond {
        status: 200,
        location: None,
        body,
    }
}

fn redirect(location: &'static str) -> Step {
    Step::Respond {
        status:   302,
        location: Some(location),
        body:     b"",
    }
}

fn timeout() -> Step { Step::Fail(TransportError::Timeout("connect".into())) }

#[derive(Default)]
struct ScriptedClient {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
    urls:  Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl HttpClient for &ScriptedClient {
    fn get(
        &self,
        url: &Url,
        _headers: &[(String, String)],
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        let step = self.steps.lock().unwrap().pop_front().expect("unexpected request");

        async move {
            match step {
                Step::Respond { status, location, body } => Ok(HttpResponse {
                    status,
                    location: location.map(str::to_string),
                    content_length: Some(body.len() as u64),
                    body: Box::pin(stream::iter(vec![Ok::<_, TransportError>(Bytes::from_static(body))])),
                }),
                Step::Fail(e) => Err(e),
                Step::Hang => std::future::pending().await,
                Step::StallBody(first) => {
                    use futures_util::StreamExt;
                    let body = stream::iter(vec![Ok::<_, TransportError>(Bytes::from_static(first))])
                        .chain(stream::pending());
                    Ok(HttpResponse {
                        status: 200,
                        location: None,
                        content_length: None,
                        body: Box::pin(body),
                    })
                }
            }
        }
    }
}

fn url() -> Url {
    Url::parse("https://github.com/trntv/wilson/releases/download/0.1.2/wilson-darwin-amd64.tar.gz").unwrap()
}

fn options() -> FetchOptions {
    FetchOptions::default().timeouts(Duration::from_secs(1), Duration::from_secs(2))
}

#[tokio::test(start_paused = true)]
async fn succeeds_on_third_attempt_after_two_timeouts() {
    let client = ScriptedClient::new([timeout(), Step::Hang, ok(b"wilson")]);
    let fetcher = Fetcher::new(&client, options());

    let bytes = fetcher.fetch(&url(), &CancellationToken::new()).await.unwrap();

    assert_eq!(&bytes[..], b"wilson");
    assert_eq!(client.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn persistent_timeout_exhausts_budget() {
    let client = ScriptedClient::new((0..4).map(|_| timeout()));
    let fetcher = Fetcher::new(&client, options());

    let err = fetcher.fetch(&url(), &CancellationToken::new()).await.unwrap_err();

    match err {
        FetchError::Unreachable { attempts, url, .. } => {
            assert_eq!(attempts, 4);
            assert!(url.ends_with("wilson-darwin-amd64.tar.gz"));
        }
        other => panic!("expected Unreachable, got {other:?}"),
    }
    assert_eq!(client.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn backoff_doubles_between_attempts() {
    let refused = || Step::Fail(TransportError::Connect("refused".into()));
    let client = ScriptedClient::new([refused(), refused(), ok(b"x")]);
    let fetcher = Fetcher::new(&client, options());

    let start = tokio::time::Instant::now();
    fetcher.fetch(&url(), &CancellationToken::new()).await.unwrap();

    // 500ms + 1s
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(1500), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(1600), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn bad_status_is_not_retried() {
    let client = ScriptedClient::new([Step::Respond {
        status:   404,
        location: None,
        body:     b"Not Found",
    }]);
    let fetcher = Fetcher::new(&client, options());

    let err = fetcher.fetch(&url(), &CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, FetchError::BadStatus { code: 404, .. }));
    assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn non_transient_transport_error_is_not_retried() {
    let client = ScriptedClient::new([Step::Fail(TransportError::Other("bad header".into()))]);
    let fetcher = Fetcher::new(&client, options());

    let err = fetcher.fetch(&url(), &CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, FetchError::Client { .. }));
    assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn follows_redirects() {
    let client = ScriptedClient::new([
        redirect("https://objects.githubusercontent.com/release-asset"),
        redirect("/release-asset?signed=1"),
        ok(b"archive"),
    ]);
    let fetcher = Fetcher::new(&client, options());

    let bytes = fetcher.fetch(&url(), &CancellationToken::new()).await.unwrap();

    assert_eq!(&bytes[..], b"archive");
    assert_eq!(
        client.urls.lock().unwrap().last().unwrap(),
        "https://objects.githubusercontent.com/release-asset?signed=1"
    );
}

#[tokio::test(start_paused = true)]
async fn redirect_loop_is_bounded() {
    let client = ScriptedClient::new((0..6).map(|_| redirect("/loop")));
    let fetcher = Fetcher::new(&client, options());

    let err = fetcher.fetch(&url(), &CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, FetchError::TooManyRedirects { limit: 5, .. }));
    assert_eq!(client.calls(), 6);
}

#[tokio::test(start_paused = true)]
async fn stalled_body_is_discarded_and_retried() {
    let client = ScriptedClient::new([Step::StallBody(b"wil"), ok(b"wilson")]);
    let fetcher = Fetcher::new(&client, options());

    let bytes = fetcher.fetch(&url(), &CancellationToken::new()).await.unwrap();

    assert_eq!(&bytes[..], b"wilson");
    assert_eq!(client.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_the_fetch() {
    let client = ScriptedClient::new([Step::Hang]);
    let fetcher = Fetcher::new(&client, options());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = fetcher.fetch(&url(), &cancel).await.unwrap_err();

    assert!(matches!(err, FetchError::Cancelled { .. }));
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_retry_backoff() {
    let client = ScriptedClient::new([timeout()]);
    let fetcher = Fetcher::new(&client, options());
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let start = tokio::time::Instant::now();
    let err = fetcher.fetch(&url(), &cancel).await.unwrap_err();

    assert!(matches!(err, FetchError::Cancelled { .. }), "{err:?}");
    assert_eq!(client.calls(), 1);
    // Backoff before the second attempt is 500ms.
    assert!(start.elapsed() < Duration::from_millis(500), "{:?}", start.elapsed());
}

#[tokio::test(start_paused = true)]
async fn downgrade_redirect_is_not_followed() {
    let client = ScriptedClient::new([redirect("http://mirror.example.com/wilson.tar.gz")]);
    let fetcher = Fetcher::new(&client, options());

    let err = fetcher.fetch(&url(), &CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, FetchError::InvalidUrl { .. }), "{err:?}");
    assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn progress_reports_phases() {
    let phases = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&phases);
    let client = ScriptedClient::new([timeout(), ok(b"wilson")]);
    let fetcher = Fetcher::new(
        &client,
        options().on_progress(move |p| sink.lock().unwrap().push((p.phase, p.attempt))),
    );

    fetcher.fetch(&url(), &CancellationToken::new()).await.unwrap();

    assert_eq!(
        *phases.lock().unwrap(),
        vec![
            (FetchPhase::Connecting, 1),
            (FetchPhase::Retrying, 1),
            (FetchPhase::Connecting, 2),
            (FetchPhase::Downloading, 2),
            (FetchPhase::Completed, 2),
        ]
    );
}
