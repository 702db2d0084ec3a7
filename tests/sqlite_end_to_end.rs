mod common;

use std::sync::Arc;
use std::time::Duration;

use graph_explorer::engine::{OneHopRequest, ResolveRequest, ShortestPathRequest};
use graph_explorer::graph::AttrValue;
use graph_explorer::{GraphError, GraphExplorer};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_shortest_path_over_sqlite() {
    let (store, _temp) = common::sqlite_store().await;
    let explorer = GraphExplorer::new(Arc::new(store), Duration::from_secs(5));

    let response = explorer
        .shortest_path(ShortestPathRequest {
            from: Some("person:1".into()),
            to: Some("phone:+7999".into()),
            edge_kinds: Vec::new(),
            max_hops: Some(6),
        })
        .await
        .unwrap();

    let nodes: Vec<_> = response.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(nodes, vec!["person:1", "person:2", "phone:+7999"]);
    assert_eq!(response.length, 2);
    assert_eq!(response.edges.len(), 2);
    assert_eq!(response.edges[0].id, "e1");
    assert_eq!(response.edges[0].kind, "transfer");
    assert_eq!(response.edges[1].id, "e2");
    assert_eq!(response.edges[1].kind, "contact");
    assert_eq!(response.nodes[0].attrs["age"], AttrValue::Integer(30));
}

#[tokio::test]
async fn test_one_hop_over_sqlite() {
    let (store, _temp) = common::sqlite_store().await;
    let explorer = GraphExplorer::new(Arc::new(store), Duration::from_secs(5));

    let response = explorer
        .one_hop(OneHopRequest {
            seeds: strings(&["person:1"]),
            cursor: Some(String::new()),
            limit: Some(10),
            edge_kinds: strings(&["transfer"]),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.edges.len(), 1);
    assert!(response.edges[0].flags.contains("confirmed"));
    assert_eq!(response.pages.len(), 1);
    assert_eq!(response.pages[0].seed, "person:1");
    assert!(!response.pages[0].has_next);
    assert_eq!(response.pages[0].end_cursor, "person:2");
}

#[tokio::test]
async fn test_resolve_over_sqlite() {
    let (store, _temp) = common::sqlite_store().await;
    let explorer = GraphExplorer::new(Arc::new(store), Duration::from_secs(5));

    let response = explorer
        .resolve(ResolveRequest {
            phone_nos: strings(&["+7999"]),
            party_rks: strings(&["7700000000"]),
            ..Default::default()
        })
        .await
        .unwrap();

    let ids: Vec<_> = response.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["phone:+7999", "company:7700000000"]);
}

#[tokio::test]
async fn test_sqlite_and_memory_stores_agree() {
    let (store, _temp) = common::sqlite_store().await;
    let sqlite = GraphExplorer::new(Arc::new(store), Duration::from_secs(5));
    let memory = common::memory_explorer();

    let request = OneHopRequest {
        seeds: strings(&["person:2"]),
        ids: strings(&["1"]),
        limit: Some(5),
        ..Default::default()
    };
    assert_eq!(
        sqlite.one_hop(request.clone()).await.unwrap(),
        memory.one_hop(request).await.unwrap()
    );

    let request = ShortestPathRequest {
        from: Some("person:1".into()),
        to: Some("phone:+7999".into()),
        max_hops: Some(1),
        ..Default::default()
    };
    let from_sqlite = sqlite.shortest_path(request.clone()).await.unwrap();
    assert!(from_sqlite.nodes.is_empty());
    assert_eq!(from_sqlite, memory.shortest_path(request).await.unwrap());
}

#[tokio::test]
async fn test_malformed_stored_flags_fail_the_request() {
    let (store, _temp) = common::sqlite_store().await;
    store
        .db()
        .with_connection(|conn| {
            conn.execute("UPDATE nodes SET flags = '[vip' WHERE id = 'person:2'", [])?;
            Ok(())
        })
        .await
        .unwrap();
    let explorer = GraphExplorer::new(Arc::new(store), Duration::from_secs(5));

    let err = explorer
        .one_hop(OneHopRequest {
            seeds: strings(&["person:1"]),
            limit: Some(10),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::MalformedPayload { column: "flags", .. }));
}
