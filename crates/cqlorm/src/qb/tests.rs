//! Integration tests for the qb module.

use crate::client::{Connection, ExecOptions};
use crate::condition::Filter;
use crate::error::{OrmError, OrmResult};
use crate::qb::{CqlQb, DeleteQb, SelectQb, SortOrder, UpdateQb, delete, insert, select, update};
use crate::row::{ResultSet, Row};
use crate::value::{Value, ValueMap};
use futures_util::StreamExt;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Default)]
struct MockConnection {
    calls: Mutex<Vec<(String, Vec<Value>, ExecOptions)>>,
    rows: Vec<Row>,
    fail_with: Option<String>,
}

impl MockConnection {
    fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<(String, Vec<Value>, ExecOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Connection for MockConnection {
    async fn execute(
        &self,
        cql: &str,
        params: &[Value],
        options: &ExecOptions,
    ) -> OrmResult<ResultSet> {
        self.calls
            .lock()
            .unwrap()
            .push((cql.to_string(), params.to_vec(), *options));
        match &self.fail_with {
            Some(message) => Err(OrmError::query(message.clone())),
            None => Ok(ResultSet::new(self.rows.clone())),
        }
    }
}

/// Field values of one captured event, rendered as text.
type EventFields = BTreeMap<String, String>;

#[derive(Default)]
struct FieldVisitor {
    fields: EventFields,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }
}

/// Keeps every event emitted on `cqlorm.query`.
#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<(tracing::Level, EventFields)>>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != "cqlorm.query" {
            return;
        }
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.fields));
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_select_basic() {
    let qb = select("ks", "users").unwrap().select(None).unwrap();
    assert_eq!(qb.to_cql(), "SELECT * FROM ks.users");
    assert!(qb.params().is_empty());
}

#[test]
fn test_select_uses_readable_columns() {
    let readable = strings(&["id", "name"]);
    let qb = SelectQb::new("ks", "users", Some(readable.as_slice()))
        .unwrap()
        .select(None)
        .unwrap();
    assert_eq!(qb.to_cql(), "SELECT id, name FROM ks.users");
}

#[test]
fn test_select_emission_order_ignores_call_order() {
    let qb = select("ks", "events")
        .unwrap()
        .allow_filtering()
        .limit(5)
        .unwrap()
        .order_by("ts", SortOrder::Desc)
        .unwrap()
        .filter(&Filter::new().eq("kind", "click").gt("ts", 10))
        .unwrap()
        .select(None)
        .unwrap();

    assert_eq!(
        qb.to_cql(),
        "SELECT * FROM ks.events WHERE kind = ? AND ts > ? ORDER BY ts DESC LIMIT 5 ALLOW FILTERING"
    );
    assert_eq!(
        qb.params().as_slice(),
        &[Value::from("click"), Value::Int(10)]
    );
}

#[test]
fn test_to_cql_is_idempotent() {
    let qb = select("ks", "t")
        .unwrap()
        .select(None)
        .unwrap()
        .filter(&Filter::new().in_list("k", vec!["a", "b"]))
        .unwrap();

    let first = qb.build();
    let second = qb.build();
    assert_eq!(first, second);
    assert_eq!(qb.to_string(), "SELECT * FROM ks.t WHERE k IN (?, ?)");
    assert_eq!(qb.params().len(), 2);
}

#[test]
fn test_empty_filter_adds_no_where() {
    let qb = delete("ks", "t").unwrap().filter(&Filter::new()).unwrap();
    assert_eq!(qb.to_cql(), "DELETE FROM ks.t");
}

#[test]
fn test_select_requires_projection() {
    let qb = select("ks", "t").unwrap().limit(1).unwrap();
    assert!(matches!(qb.validate(), Err(OrmError::MissingFragment("SELECT"))));
}

#[test]
fn test_constructors_validate_names() {
    assert!(matches!(select("", "t"), Err(OrmError::InvalidKeyspace(_))));
    assert!(matches!(insert("ks", ""), Err(OrmError::InvalidTable(_))));
    assert!(matches!(
        UpdateQb::new("ks", "t", Some(&[])),
        Err(OrmError::InvalidRestrictions(_))
    ));
    assert!(matches!(
        SelectQb::new("ks", "t", Some(&[])),
        Err(OrmError::EmptyReadableSet)
    ));
}

#[test]
fn test_insert_with_using() {
    let qb = insert("ks", "users")
        .unwrap()
        .using_options(&ValueMap::new().set("ttl", 60))
        .unwrap()
        .insert_values(&ValueMap::new().set("id", 1).set("name", "alice"))
        .unwrap();

    assert_eq!(
        qb.to_cql(),
        "INSERT INTO ks.users (id, name) VALUES (?, ?) USING TTL 60"
    );
    assert_eq!(
        qb.params().as_slice(),
        &[Value::Int(1), Value::from("alice")]
    );
}

#[test]
fn test_insert_requires_values() {
    let qb = insert("ks", "users").unwrap();
    assert!(matches!(qb.validate(), Err(OrmError::MissingFragment("INSERT"))));
}

#[test]
fn test_update_params_follow_emission_order() {
    let qb = update("ks", "t")
        .unwrap()
        .filter(&Filter::new().eq("key1", "v1"))
        .unwrap()
        .set(&ValueMap::new().set("key2", "v2"))
        .unwrap()
        .using_options(&ValueMap::new().set("TTL", 100))
        .unwrap();

    assert_eq!(
        qb.to_cql(),
        "UPDATE ks.t USING TTL 100 SET key2 = ? WHERE key1 = ?"
    );
    assert_eq!(
        qb.params().as_slice(),
        &[Value::from("v2"), Value::from("v1")]
    );
}

#[test]
fn test_update_enforces_restrictions() {
    let allowed = strings(&["name"]);
    let qb = UpdateQb::new("ks", "t", Some(allowed.as_slice())).unwrap();
    let err = qb
        .set(&ValueMap::new().set("email", "x"))
        .unwrap_err();
    assert!(matches!(err, OrmError::RestrictedField(ref f) if f == "email"));
}

#[test]
fn test_update_requires_set() {
    let qb = update("ks", "t")
        .unwrap()
        .filter(&Filter::new().eq("id", 1))
        .unwrap();
    assert!(matches!(qb.validate(), Err(OrmError::MissingFragment("SET"))));
}

#[test]
fn test_delete_with_timestamp() {
    let qb = DeleteQb::new("ks", "t")
        .unwrap()
        .filter(&Filter::new().eq("key1", "val1"))
        .unwrap()
        .using_options(&ValueMap::new().set("timestamp", 1_700_000_000_i64))
        .unwrap();
    assert_eq!(
        qb.to_cql(),
        "DELETE FROM ks.t USING TIMESTAMP 1700000000 WHERE key1 = ?"
    );
}

#[test]
fn test_fragment_errors_propagate() {
    assert!(matches!(
        select("ks", "t").unwrap().limit(0),
        Err(OrmError::InvalidLimit(_))
    ));
    assert!(matches!(
        delete("ks", "t")
            .unwrap()
            .using_options(&ValueMap::new().set("consistency", "ONE")),
        Err(OrmError::UnsupportedOption(_))
    ));
    assert!(matches!(
        select("ks", "t")
            .unwrap()
            .filter(&Filter::new().in_list("k", Vec::<i64>::new())),
        Err(OrmError::EmptyInList(_))
    ));
}

#[tokio::test]
async fn test_execute_sends_prepared_statement() {
    let conn = MockConnection::with_rows(vec![Row::new().with("id", 1)]);
    let result = select("ks", "t")
        .unwrap()
        .select(None)
        .unwrap()
        .filter(&Filter::new().eq("id", 1))
        .unwrap()
        .execute(&conn)
        .await
        .unwrap();

    assert_eq!(result.rows.len(), 1);
    let calls = conn.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "SELECT * FROM ks.t WHERE id = ?");
    assert_eq!(calls[0].1, vec![Value::Int(1)]);
    assert!(calls[0].2.prepare);
}

#[tokio::test]
async fn test_execute_forwards_driver_error_unchanged() {
    let conn = MockConnection::failing("unconfigured table t");
    let err = delete("ks", "t")
        .unwrap()
        .filter(&Filter::new().eq("id", 1))
        .unwrap()
        .execute(&conn)
        .await
        .unwrap_err();

    assert!(matches!(err, OrmError::Query(ref m) if m == "unconfigured table t"));
}

#[tokio::test]
async fn test_execute_validates_before_io() {
    let conn = MockConnection::default();
    let err = insert("ks", "t").unwrap().execute(&conn).await.unwrap_err();
    assert!(matches!(err, OrmError::MissingFragment("INSERT")));
    assert!(conn.calls().is_empty());
}

#[tokio::test]
async fn test_stream_and_each_row_pass_through() {
    let rows = vec![Row::new().with("id", 1), Row::new().with("id", 2)];
    let conn = MockConnection::with_rows(rows.clone());

    let qb = select("ks", "t").unwrap().select(None).unwrap();
    let streamed: Vec<Row> = qb
        .clone()
        .stream(&conn)
        .unwrap()
        .map(|r| r.unwrap())
        .collect()
        .await;
    assert_eq!(streamed, rows);

    let mut seen = Vec::new();
    let count = qb
        .each_row(&conn, ExecOptions::default().fetch_size(1), |i, row| {
            seen.push((i, row))
        })
        .await
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(seen[1].0, 1);

    let calls = conn.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].2.fetch_size, Some(1));
    assert!(calls[1].2.prepare);
}

#[tokio::test]
async fn test_driver_failure_is_logged_with_statement_and_params() {
    let capture = CaptureLayer::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(capture.clone()));

    let conn = MockConnection::failing("unconfigured table t");
    let err = update("ks", "t")
        .unwrap()
        .set(&ValueMap::new().set("name", "bob"))
        .unwrap()
        .filter(&Filter::new().eq("id", 7))
        .unwrap()
        .execute(&conn)
        .await
        .unwrap_err();
    assert!(err.is_query_error());

    let events = capture.events.lock().unwrap().clone();
    let (_, failure) = events
        .iter()
        .find(|(level, _)| *level == tracing::Level::ERROR)
        .expect("no error event");
    assert_eq!(failure["cql"], "UPDATE ks.t SET name = ? WHERE id = ?");
    assert_eq!(failure["params"], r#"["bob",7]"#);
    assert_eq!(failure["message"], "Query error: unconfigured table t");
}

#[tokio::test]
async fn test_successful_execute_logs_no_error() {
    let capture = CaptureLayer::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(capture.clone()));

    let conn = MockConnection::default();
    delete("ks", "t")
        .unwrap()
        .filter(&Filter::new().eq("id", 1))
        .unwrap()
        .execute(&conn)
        .await
        .unwrap();

    let events = capture.events.lock().unwrap().clone();
    assert!(events.iter().all(|(level, _)| *level != tracing::Level::ERROR));
    assert!(
        events
            .iter()
            .any(|(_, f)| f.get("cql").map(String::as_str) == Some("DELETE FROM ks.t WHERE id = ?"))
    );
}
