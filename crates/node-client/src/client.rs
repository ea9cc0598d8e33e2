//! Streaming API client for the node HTTP interface.

use std::io;
use std::pin::Pin;
use std::time::Duration;

use futures::{Stream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio_util::codec::FramedRead;
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::NodeClientConfig;
use crate::error::{ClientError, ProcessorError};
use crate::framing::{FrameError, JsonFrameDecoder};
use crate::query::ApiRequest;
use crate::stream::{StreamControl, StreamEnd, StreamLifecycle, StreamSubscription, StreamSummary};

/// Longest slice of an error body kept in [`ClientError::Status`].
const ERROR_BODY_LIMIT: usize = 256;

type FrameStream = Pin<Box<dyn Stream<Item = Result<Value, FrameError>> + Send>>;

/// HTTP client for the node API.
///
/// Every streaming call opens its own request; nothing is retried.
#[derive(Clone, Debug)]
pub struct StreamingApiClient {
    http: reqwest::Client,
    config: NodeClientConfig,
    api_root: String,
}

impl StreamingApiClient {
    /// Create a new client.
    pub fn new(config: NodeClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .gzip(config.gzip)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))?;

        let api_root = config.api_root();
        Ok(Self {
            http,
            config,
            api_root,
        })
    }

    /// Client configuration.
    pub fn config(&self) -> &NodeClientConfig {
        &self.config
    }

    /// Full URL for a request, query string included.
    pub fn url_for(&self, request: &ApiRequest) -> String {
        let query = request.query_string();
        if query.is_empty() {
            format!("{}/{}", self.api_root, request.path())
        } else {
            format!("{}/{}?{}", self.api_root, request.path(), query)
        }
    }

    /// A view of this client bound to one service.
    pub fn for_service(&self, service: impl Into<String>) -> ServiceClient<'_> {
        ServiceClient {
            client: self,
            service: service.into(),
        }
    }

    /// Collect every item of a streamed response, in order.
    pub async fn call<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<Vec<T>, ClientError> {
        info!(method = %request.method, "calling API");

        let mut out = Vec::new();
        let never = CancellationToken::new();
        self.call_streaming(
            request,
            |item: T| {
                out.push(item);
                Ok(StreamControl::Continue)
            },
            &never,
        )
        .await?;
        Ok(out)
    }

    /// Stream a response, handing each JSON document to `on_item`.
    ///
    /// Settles exactly once: `Ok` when the body ends, the consumer stops, or
    /// `cancel` fires; `Err` on transport, status, decode or consumer failure.
    /// The connection is dropped as soon as the call settles.
    pub async fn call_streaming<T, F>(
        &self,
        request: &ApiRequest,
        mut on_item: F,
        cancel: &CancellationToken,
    ) -> Result<StreamSummary, ClientError>
    where
        T: DeserializeOwned,
        F: FnMut(T) -> Result<StreamControl, ProcessorError>,
    {
        let url = self.url_for(request);
        info!(service = %request.service, method = %request.method, "calling API stream");
        debug!(%url, "sending HTTP request to node");

        let mut lifecycle = StreamLifecycle::new();

        let mut frames = match self.open_stream(&url, cancel).await {
            Ok(Some(frames)) => frames,
            Ok(None) => {
                lifecycle.terminate(Ok(StreamEnd::Cancelled));
                return lifecycle.into_outcome();
            }
            Err(e) => {
                error!(%url, error = %e, "got error opening HTTP stream");
                lifecycle.terminate(Err(e));
                return lifecycle.into_outcome();
            }
        };

        while lifecycle.is_open() {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(%url, "stream cancelled by caller");
                    lifecycle.terminate(Ok(StreamEnd::Cancelled));
                    continue;
                }
                frame = frames.next() => frame,
            };

            match next {
                None => {
                    lifecycle.terminate(Ok(StreamEnd::Completed));
                }
                Some(Err(e)) => {
                    let e = ClientError::from(e);
                    error!(%url, error = %e, "got error in HTTP stream handler");
                    lifecycle.terminate(Err(e));
                }
                Some(Ok(value)) => match serde_json::from_value::<T>(value) {
                    Err(e) => {
                        error!(%url, error = %e, "stream item has unexpected shape");
                        lifecycle.terminate(Err(ClientError::Decode(e.to_string())));
                    }
                    Ok(item) => {
                        lifecycle.record_delivery();
                        match on_item(item) {
                            Ok(StreamControl::Continue) => {}
                            Ok(StreamControl::Stop) => {
                                debug!(%url, delivered = lifecycle.delivered(), "consumer ended stream early");
                                lifecycle.terminate(Ok(StreamEnd::Stopped));
                            }
                            Err(e) => {
                                error!(%url, error = %e, "aborted due to error in data processor");
                                lifecycle.terminate(Err(ClientError::Processor(e)));
                            }
                        }
                    }
                },
            }
        }

        // Dropping the body aborts the underlying connection.
        drop(frames);
        lifecycle.into_outcome()
    }

    /// Run a streaming call on its own task.
    ///
    /// The returned handle can cancel the stream and resolves once with the
    /// call's outcome.
    pub fn spawn_streaming<T, F>(&self, request: ApiRequest, on_item: F) -> StreamSubscription
    where
        T: DeserializeOwned + Send + 'static,
        F: FnMut(T) -> Result<StreamControl, ProcessorError> + Send + 'static,
    {
        let client = self.clone();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let (settle_tx, settle_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            let outcome = client.call_streaming(&request, on_item, &token).await;
            if settle_tx.send(outcome).is_err() {
                debug!("stream subscription dropped before settlement");
            }
        });

        StreamSubscription::new(cancel, settle_rx, task)
    }

    /// Fetch one JSON document from `{api_root}/{path}`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}/{}", self.api_root, path.trim_start_matches('/'));
        info!(path, "getting JSON");

        let response = self
            .http
            .post(&url)
            .timeout(Duration::from_millis(self.config.request_timeout_ms))
            .send()
            .await
            .map_err(|e| transport_error(e, &url))?;

        let response = check_status(response).await?;
        let body = response.bytes().await.map_err(|e| transport_error(e, &url))?;

        serde_json::from_slice(&body)
            .map_err(|e| ClientError::Decode(format!("{}: {}", path, e)))
    }

    async fn open_stream(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<FrameStream>, ClientError> {
        let send = self.http.post(url).send();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(None),
            response = send => response.map_err(|e| transport_error(e, url))?,
        };

        let response = check_status(response).await?;
        let body = response.bytes_stream().map_err(io::Error::other);
        let frames = FramedRead::new(
            StreamReader::new(body),
            JsonFrameDecoder::new(self.config.max_frame_bytes),
        );
        Ok(Some(Box::pin(frames)))
    }
}

/// Client bound to a single service, e.g. `show`.
#[derive(Clone, Debug)]
pub struct ServiceClient<'a> {
    client: &'a StreamingApiClient,
    service: String,
}

impl ServiceClient<'_> {
    /// Service name this view is bound to.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Build a request for `method` on this service.
    pub fn request(&self, method: impl Into<String>) -> ApiRequest {
        ApiRequest::new(self.service.clone(), method)
    }

    /// Collect every item of `method`'s streamed response.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        args: &[String],
        options: &[(String, String)],
    ) -> Result<Vec<T>, ClientError> {
        let request = self.build(method, args, options);
        self.client.call(&request).await
    }

    /// Stream `method`'s response into `on_item`.
    pub async fn call_streaming<T, F>(
        &self,
        method: &str,
        args: &[String],
        options: &[(String, String)],
        on_item: F,
        cancel: &CancellationToken,
    ) -> Result<StreamSummary, ClientError>
    where
        T: DeserializeOwned,
        F: FnMut(T) -> Result<StreamControl, ProcessorError>,
    {
        let request = self.build(method, args, options);
        self.client.call_streaming(&request, on_item, cancel).await
    }

    fn build(&self, method: &str, args: &[String], options: &[(String, String)]) -> ApiRequest {
        let mut request = self.request(method).args(args.iter().cloned());
        request.options = options.to_vec();
        request
    }
}

fn transport_error(e: reqwest::Error, url: &str) -> ClientError {
    if e.is_connect() {
        warn!(%url, "cannot connect to node");
        ClientError::Transport(format!("cannot connect to {}: {}", url, e))
    } else if e.is_timeout() {
        ClientError::Transport(format!("request to {} timed out", url))
    } else {
        ClientError::from(e)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body: body.chars().take(ERROR_BODY_LIMIT).collect(),
    })
}
