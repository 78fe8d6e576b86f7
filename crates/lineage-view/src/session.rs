//! Drives a [`LineageController`] against a [`LineageSource`] and a [`LayoutEngine`].
//!
//! Fetches and layouts run as futures in one `FuturesUnordered` set and complete in any order;
//! the controller's sequence numbers decide which completions still matter. Everything runs on
//! the caller's executor, on one logical thread.

use crate::controller::{FetchError, LineageController, LineageRequest, RequestSeq};
use crate::layout::LayoutEngine;
use crate::model::PositionedGraph;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use lineage_core::{RawLineage, ViewDirection};
use std::time::Instant;

/// The Lineage API.
pub trait LineageSource {
    fn fetch(
        &self,
        request: &LineageRequest,
    ) -> LocalBoxFuture<'static, Result<RawLineage, FetchError>>;
}

/// Serves one fixed payload for every request.
#[derive(Debug, Clone)]
pub struct StaticSource {
    payload: RawLineage,
}

impl StaticSource {
    pub fn new(payload: RawLineage) -> Self {
        Self { payload }
    }
}

impl LineageSource for StaticSource {
    fn fetch(
        &self,
        _request: &LineageRequest,
    ) -> LocalBoxFuture<'static, Result<RawLineage, FetchError>> {
        futures::future::ready(Ok(self.payload.clone())).boxed_local()
    }
}

enum Completion {
    Fetched(LineageRequest, Result<RawLineage, FetchError>),
    LaidOut(RequestSeq, PositionedGraph),
}

pub struct Session<S> {
    controller: LineageController,
    source: S,
    engine: LayoutEngine,
    in_flight: FuturesUnordered<LocalBoxFuture<'static, Completion>>,
}

impl<S: LineageSource> Session<S> {
    pub fn new(controller: LineageController, source: S, engine: LayoutEngine) -> Self {
        Self {
            controller,
            source,
            engine,
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn controller(&self) -> &LineageController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut LineageController {
        &mut self.controller
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of fetches and layouts not yet completed.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn mount(&mut self) {
        let requests = self.controller.mount();
        self.dispatch(requests);
    }

    pub fn refresh(&mut self) {
        let requests = self.controller.refresh();
        self.dispatch(requests);
    }

    pub fn set_direction(&mut self, direction: ViewDirection) {
        let requests = self.controller.set_direction(direction);
        self.dispatch(requests);
    }

    pub fn set_depth(&mut self, depth: u32) {
        let requests = self.controller.set_depth(depth);
        self.dispatch(requests);
    }

    fn dispatch(&mut self, requests: Vec<LineageRequest>) {
        for request in requests {
            let fetch = self.source.fetch(&request);
            self.in_flight.push(
                async move {
                    let result = fetch.await;
                    Completion::Fetched(request, result)
                }
                .boxed_local(),
            );
        }
    }

    /// Waits for the next completion and applies it. Returns `false` when nothing is in flight.
    pub async fn next(&mut self) -> bool {
        let Some(completion) = self.in_flight.next().await else {
            return false;
        };
        self.handle(completion, Instant::now());
        true
    }

    /// Processes completions until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.controller.tick(now)
    }

    fn handle(&mut self, completion: Completion, now: Instant) {
        match completion {
            Completion::Fetched(request, result) => {
                if let Some(job) = self.controller.on_fetched(&request, result) {
                    let engine = self.engine.clone();
                    self.in_flight.push(
                        async move {
                            let seq = job.seq;
                            Completion::LaidOut(seq, engine.layout(job.graph).await)
                        }
                        .boxed_local(),
                    );
                }
            }
            Completion::LaidOut(seq, graph) => {
                self.controller.on_layout(seq, graph, now);
            }
        }
    }
}
