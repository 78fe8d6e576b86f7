use futures::channel::oneshot;
use futures::executor::block_on;
use futures::future::{FutureExt, LocalBoxFuture};
use lineage_core::{LineageConfig, RawLineage, RawNode, ViewDirection, parse_payload};
use lineage_view::{
    FetchError, LayoutEngine, LineageController, LineageRequest, LineageSource, Session,
    StaticSource, ViewStatus,
};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

fn payload(depth: i64, truncated: bool) -> RawLineage {
    parse_payload(
        &json!({
            "root": {"id": 1, "source_name": "warehouse", "schema_name": "public",
                     "object_name": "users", "object_type": "TABLE", "distance": 0},
            "nodes": [
                {"id": 2, "source_name": "warehouse", "schema_name": "public",
                 "object_name": "orders_view", "object_type": "VIEW", "distance": 1}
            ],
            "edges": [{"from_id": 2, "to_id": 1, "dependency_type": "DIRECT", "confidence": "HIGH"}],
            "direction": "upstream",
            "depth": depth,
            "truncated": truncated
        })
        .to_string(),
    )
    .unwrap()
}

type Reply = oneshot::Sender<Result<RawLineage, FetchError>>;

/// Hands every request to the test, which answers it whenever it likes.
#[derive(Clone, Default)]
struct ScriptedSource {
    pending: Rc<RefCell<Vec<(LineageRequest, Reply)>>>,
}

impl ScriptedSource {
    fn take(&self, seq: u64) -> (LineageRequest, Reply) {
        let mut pending = self.pending.borrow_mut();
        let idx = pending.iter().position(|(r, _)| r.seq == seq).unwrap();
        pending.remove(idx)
    }
}

impl LineageSource for ScriptedSource {
    fn fetch(
        &self,
        request: &LineageRequest,
    ) -> LocalBoxFuture<'static, Result<RawLineage, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push((request.clone(), tx));
        async move {
            rx.await
                .unwrap_or_else(|_| Err(FetchError::new("request dropped")))
        }
        .boxed_local()
    }
}

fn session(source: ScriptedSource) -> Session<ScriptedSource> {
    let config = LineageConfig::default();
    Session::new(
        LineageController::new("1", &config),
        source,
        LayoutEngine::from_config(&config),
    )
}

#[test]
fn out_of_order_responses_keep_the_latest_request() {
    let source = ScriptedSource::default();
    let mut s = session(source.clone());
    s.mount();
    s.set_depth(5);
    assert_eq!(s.in_flight(), 2);

    // The newer request answers first.
    let (_, reply) = source.take(2);
    reply.send(Ok(payload(5, false))).unwrap();
    assert!(block_on(s.next()));
    assert!(block_on(s.next()));
    assert_eq!(s.controller().state().status, ViewStatus::Ready);
    assert_eq!(s.controller().state().depth, 5);

    // The older one arrives late and is dropped on the floor.
    let (_, reply) = source.take(1);
    let mut stale = payload(3, true);
    stale.nodes.push(RawNode::new(9, "warehouse", "public", "stale", "TABLE", 1));
    reply.send(Ok(stale)).unwrap();
    block_on(s.settle());

    let state = s.controller().state();
    assert_eq!(state.depth, 5);
    assert!(!state.truncated);
    assert!(state.graph.as_ref().unwrap().node("9").is_none());
    assert_eq!(s.in_flight(), 0);
}

#[test]
fn rapid_changes_settle_on_the_last_controls() {
    let source = ScriptedSource::default();
    let mut s = session(source.clone());
    s.mount();
    s.set_depth(2);
    s.set_direction(ViewDirection::Downstream);
    s.set_depth(4);
    assert_eq!(s.controller().latest_seq(), 4);

    // Answer everything in issue order.
    for seq in 1..=4 {
        let (req, reply) = source.take(seq);
        reply.send(Ok(payload(i64::from(req.depth), false))).unwrap();
    }
    block_on(s.settle());

    let state = s.controller().state();
    assert_eq!(state.status, ViewStatus::Ready);
    assert_eq!(state.depth, 4);
    assert_eq!(state.direction, ViewDirection::Downstream);
}

#[test]
fn failed_fetch_surfaces_an_error() {
    let source = ScriptedSource::default();
    let mut s = session(source.clone());
    s.mount();
    let (_, reply) = source.take(1);
    reply.send(Err(FetchError::new("connection reset"))).unwrap();
    block_on(s.settle());

    assert_eq!(
        s.controller().state().status,
        ViewStatus::Failed("connection reset".to_string())
    );
    assert!(s.controller().state().graph.is_none());
}

#[test]
fn dropped_request_counts_as_failure() {
    let source = ScriptedSource::default();
    let mut s = session(source.clone());
    s.mount();
    drop(source.take(1));
    block_on(s.settle());
    assert_eq!(s.controller().state().error(), Some("request dropped"));
}

#[test]
fn static_source_runs_the_whole_pipeline() {
    let config = LineageConfig::default();
    let mut s = Session::new(
        LineageController::new("1", &config),
        StaticSource::new(payload(2, true)),
        LayoutEngine::from_config(&config),
    );
    s.mount();
    block_on(s.settle());

    let state = s.controller().state();
    assert_eq!(state.status, ViewStatus::Ready);
    assert!(state.truncated);
    assert_eq!(state.depth, 2);
    assert_eq!(state.graph.as_ref().unwrap().nodes.len(), 2);

    let due = s.controller().fit_due().unwrap();
    assert!(s.tick(due + Duration::from_millis(1)));
    assert!(!s.tick(Instant::now() + Duration::from_secs(1)));
}
