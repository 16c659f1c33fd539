//! Handler chain types.
//!
//! Handlers follow the middleware shape `fn(req, res, next)`. The router
//! builds the chain for every dispatch; running it is up to the consumer,
//! which can use [`Next::run`] or drive the slice itself.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::routing::matcher::Params;

pub const STATUS_OK: u16 = 200;
pub const STATUS_NOT_FOUND: u16 = 404;

/// Request-like object populated by the bootstrap handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Request {
    pub route: String,
    pub params: Params,
    pub query: Params,
    pub body: Params,
}

/// Response-like object; handlers record the outcome status here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Response {
    pub status_code: u16,
}

/// A single middleware handler.
pub type Handler = Arc<dyn Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Continuation over the handlers that follow the current one.
pub struct Next<'a> {
    rest: &'a [Handler],
}

impl<'a> Next<'a> {
    /// Start a chain at its first handler.
    pub fn chain(handlers: &'a [Handler]) -> Self {
        Self { rest: handlers }
    }

    /// Invoke the next handler, if any.
    pub fn run(self, req: &mut Request, res: &mut Response) {
        if let Some((first, rest)) = self.rest.split_first() {
            first(req, res, Next { rest });
        }
    }

    /// Number of handlers still pending.
    pub fn remaining(&self) -> usize {
        self.rest.len()
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.rest.len())
            .finish()
    }
}

/// Synthetic first handler of every matched chain.
pub(crate) fn bootstrap(params: Params, query: Params, body: Params, route: String) -> Handler {
    handler(move |req, res, next| {
        res.status_code = STATUS_OK;
        req.params = params.clone();
        req.query = query.clone();
        req.body = body.clone();
        req.route = route.clone();
        next.run(req, res);
    })
}

/// Sole handler of a not-found chain.
pub(crate) fn not_found(route: String) -> Handler {
    handler(move |req, res, next| {
        res.status_code = STATUS_NOT_FOUND;
        req.route = route.clone();
        tracing::debug!(route = %req.route, "Page does not exist");
        next.run(req, res);
    })
}
