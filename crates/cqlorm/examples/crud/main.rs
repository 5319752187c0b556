//! CRUD walkthrough against a stand-in driver that prints every statement.
//!
//! Swap `EchoDriver` for a real driver integration to run against a cluster.

use cqlorm::prelude::*;
use futures_util::StreamExt;
use serde_json::json;

const USERS: &str = r#"{
    "keyspace": "app",
    "table": "users",
    "fields": {
        "id": {"type": "uuid", "required": true},
        "name": {"type": "text"},
        "email": {"type": "text"},
        "logins": {"type": "bigint"}
    },
    "primaryKeys": ["id"],
    "readable": ["id", "name", "email", "logins"],
    "updateRestrictions": ["name", "email"]
}"#;

const CLUSTER: &str = r#"
[hosts.default]
host = ["127.0.0.1", "127.0.0.2"]
"#;

struct EchoConnection;

impl Connection for EchoConnection {
    async fn execute(
        &self,
        cql: &str,
        params: &[Value],
        _options: &ExecOptions,
    ) -> OrmResult<ResultSet> {
        let params: Vec<String> = params.iter().map(ToString::to_string).collect();
        println!("{cql}  -- [{}]", params.join(", "));

        let row = Row::new()
            .with("id", Value::Uuid(uuid::Uuid::nil()))
            .with("name", "alice")
            .with("email", "alice@example.com")
            .with("logins", Value::BigInt(7));
        Ok(ResultSet::new(vec![row]))
    }
}

#[derive(Debug)]
struct EchoDriver;

impl Connector for EchoDriver {
    type Connection = EchoConnection;

    fn connect(&self, contact_points: &[String]) -> OrmResult<EchoConnection> {
        println!("connect {}", contact_points.join(", "));
        Ok(EchoConnection)
    }
}

#[tokio::main]
async fn main() -> OrmResult<()> {
    let pool = Arc::new(ConnectionPool::new(
        ClusterConfig::from_toml_str(CLUSTER)?,
        EchoDriver,
    ));
    let users = Model::new(SchemaMap::from_json_str(USERS)?, Arc::clone(&pool), None)?;
    let id = uuid::Uuid::nil();

    users
        .insert(
            &ValueMap::new()
                .set("id", id)
                .set("name", "alice")
                .set("email", "alice@example.com"),
            &WriteOptions::new().ttl(86_400),
        )
        .await?;

    let rows = users
        .find(
            &Filter::new().eq("id", id),
            &FindOptions::from_json(&json!({"columns": ["name", "logins"], "postProcess": true}))?,
        )
        .await?;
    println!("{}", serde_json::to_string(&rows).unwrap_or_default());

    if let Some(user) = users
        .find_one(&Filter::new().eq("id", id), &FindOptions::default())
        .await?
    {
        println!("name = {}", user.try_get::<String>("name")?);
    }

    users
        .update(
            &Filter::new().eq("id", id),
            &ValueMap::new().set("email", "alice@example.org"),
            &WriteOptions::default(),
        )
        .await?;

    // `logins` is not in the update allow-list.
    let denied = users
        .update(
            &Filter::new().eq("id", id),
            &ValueMap::new().set("logins", 0),
            &WriteOptions::default(),
        )
        .await;
    println!("restricted update: {}", denied.unwrap_err());

    let conn = pool.get_connection(None)?;
    let mut rows = cqlorm::qb::select("app", "users")?
        .select(None)?
        .filter(&Filter::new().in_list("id", vec![id]))?
        .stream(&*conn)?;
    while let Some(row) = rows.next().await {
        println!("streamed {:?}", row?.get("name"));
    }

    users
        .delete(&Filter::new().eq("id", id), &WriteOptions::new())
        .await?;

    Ok(())
}
