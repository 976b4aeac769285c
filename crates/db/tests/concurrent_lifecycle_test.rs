//! Racing lifecycle transitions on a pooled file database.
//!
//! Each race releases two tasks through a barrier so their statements reach
//! SQLite on different pooled connections at the same time.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::sync::Barrier;
use vatdesk_core::lifecycle::{
    Confirmation, DeclarationStatus, DeclarationStore, NewDeclarationRecord,
};
use vatdesk_core::period::YearMonth;
use vatdesk_db::DeclarationRepository;
use vatdesk_db::migration::{Migrator, MigratorTrait};
use vatdesk_shared::types::{DeclarationId, Nip};

const TENANT: &str = "6793194113";
const ROUNDS: usize = 16;

struct FileDatabase {
    db: DatabaseConnection,
    path: PathBuf,
}

impl FileDatabase {
    async fn open() -> Self {
        let path = std::env::temp_dir().join(format!("vatdesk-race-{}.db", DeclarationId::new()));
        let mut options = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
        options
            .max_connections(4)
            .min_connections(2)
            .sqlx_logging(false);

        let db = Database::connect(options)
            .await
            .expect("Failed to open SQLite file");
        Migrator::up(&db, None).await.expect("Failed to migrate");
        Self { db, path }
    }

    async fn close(self) {
        self.db.close().await.expect("Failed to close pool");
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

fn tenant() -> Nip {
    Nip::parse(TENANT).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 5, 9, 30, 0).unwrap()
}

fn draft() -> NewDeclarationRecord {
    NewDeclarationRecord {
        tenant: tenant(),
        period: YearMonth::new(2024, 5).unwrap(),
        content: b"<JPK/>".to_vec(),
        generated_at: now(),
        amount_due: 161,
        carry_forward: 0,
    }
}

fn confirmation(code: &str) -> Confirmation {
    Confirmation::new(code, now()).unwrap()
}

async fn confirm_after(
    barrier: Arc<Barrier>,
    store: DeclarationRepository,
    id: DeclarationId,
    code: &'static str,
) -> bool {
    barrier.wait().await;
    store
        .confirm(&tenant(), id, &confirmation(code))
        .await
        .unwrap()
}

async fn delete_after(barrier: Arc<Barrier>, store: DeclarationRepository, id: DeclarationId) -> bool {
    barrier.wait().await;
    store.delete(&tenant(), id).await.unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_confirmations_keep_exactly_one() {
    let file = FileDatabase::open().await;
    let store = DeclarationRepository::new(file.db.clone());

    for _ in 0..ROUNDS {
        let id = store.insert(draft()).await.unwrap();
        let barrier = Arc::new(Barrier::new(2));

        let a = tokio::spawn(confirm_after(Arc::clone(&barrier), store.clone(), id, "UPO-A"));
        let b = tokio::spawn(confirm_after(Arc::clone(&barrier), store.clone(), id, "UPO-B"));
        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert!(a ^ b, "exactly one confirmation must win (a={a}, b={b})");

        let stored = store.find(&tenant(), id).await.unwrap().unwrap();
        let winner = if a { "UPO-A" } else { "UPO-B" };
        assert_eq!(stored.metadata.status(), DeclarationStatus::Confirmed);
        assert_eq!(stored.metadata.reference_code(), Some(winner));
    }

    file.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_confirm_racing_delete_never_loses_a_confirmation() {
    let file = FileDatabase::open().await;
    let store = DeclarationRepository::new(file.db.clone());

    for _ in 0..ROUNDS {
        let id = store.insert(draft()).await.unwrap();
        let barrier = Arc::new(Barrier::new(2));

        let confirm = tokio::spawn(confirm_after(Arc::clone(&barrier), store.clone(), id, "UPO-1"));
        let delete = tokio::spawn(delete_after(Arc::clone(&barrier), store.clone(), id));
        let (confirmed, deleted) = (confirm.await.unwrap(), delete.await.unwrap());
        assert!(
            confirmed ^ deleted,
            "exactly one transition must win (confirmed={confirmed}, deleted={deleted})"
        );

        let stored = store.find(&tenant(), id).await.unwrap();
        if confirmed {
            let stored = stored.expect("a confirmed declaration must survive");
            assert_eq!(stored.metadata.reference_code(), Some("UPO-1"));
        } else {
            assert!(stored.is_none());
        }
    }

    file.close().await;
}
