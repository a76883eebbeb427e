use chrono::NaiveDate;
use ems_studio::config::LedgerConfig;
use ems_studio::workflows::packages::{
    ClientPackage, ClientPackageId, Package, PackageId, PackageLedgerService, PackageRepository,
};
use ems_studio::workflows::repository::RepositoryError;
use ems_studio::workflows::roster::{
    Client, ClientId, Coach, CoachId, RosterRepository, RosterService, StudioId,
};
use ems_studio::workflows::scheduling::{
    RoomId, SchedulingService, Session, SessionId, SessionRepository,
};
use ems_studio::workflows::transactions::{
    TransactionId, TransactionLedgerService, TransactionRecord, TransactionRepository,
};
use ems_studio::workflows::waiting_list::{
    ClientNotification, NotificationError, Notifier, WaitingListEntry, WaitingListEntryId,
    WaitingListRepository, WaitingListService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type TransactionLedger = TransactionLedgerService<InMemoryTransactionRepository>;
pub(crate) type PackageLedger = PackageLedgerService<InMemoryPackageRepository, TransactionLedger>;
pub(crate) type WaitingList = WaitingListService<InMemoryWaitingListRepository, LoggingNotifier>;
pub(crate) type Roster = RosterService<InMemoryRosterRepository>;
pub(crate) type Scheduling = SchedulingService<InMemorySessionRepository, InMemoryRosterRepository>;

/// Every workflow service wired against process-local storage.
#[derive(Clone)]
pub(crate) struct StudioServices {
    pub(crate) transactions: Arc<TransactionLedger>,
    pub(crate) packages: Arc<PackageLedger>,
    pub(crate) waiting_list: Arc<WaitingList>,
    pub(crate) roster: Arc<Roster>,
    pub(crate) scheduling: Arc<Scheduling>,
    pub(crate) notifier: Arc<LoggingNotifier>,
}

impl StudioServices {
    pub(crate) fn in_memory(ledger: &LedgerConfig) -> Self {
        let transactions = Arc::new(
            TransactionLedgerService::new(Arc::new(InMemoryTransactionRepository::default()))
                .with_summary_window(ledger.summary_window_days),
        );
        let packages = Arc::new(PackageLedgerService::new(
            Arc::new(InMemoryPackageRepository::default()),
            transactions.clone(),
        ));
        let notifier = Arc::new(LoggingNotifier::default());
        let waiting_list = Arc::new(
            WaitingListService::new(
                Arc::new(InMemoryWaitingListRepository::default()),
                notifier.clone(),
            )
            .with_page_size(ledger.waiting_list_page_size),
        );
        let roster_repository = Arc::new(InMemoryRosterRepository::default());
        let roster = Arc::new(RosterService::new(roster_repository.clone()));
        let scheduling = Arc::new(SchedulingService::new(
            Arc::new(InMemorySessionRepository::default()),
            roster_repository,
        ));

        Self {
            transactions,
            packages,
            waiting_list,
            roster,
            scheduling,
            notifier,
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTransactionRepository {
    records: Arc<Mutex<HashMap<TransactionId, TransactionRecord>>>,
}

impl TransactionRepository for InMemoryTransactionRepository {
    fn insert(&self, record: TransactionRecord) -> Result<TransactionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: TransactionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &TransactionId) -> Result<Option<TransactionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPackageRepository {
    packages: Arc<Mutex<HashMap<PackageId, Package>>>,
    client_packages: Arc<Mutex<HashMap<ClientPackageId, ClientPackage>>>,
}

impl PackageRepository for InMemoryPackageRepository {
    fn insert_package(&self, package: Package) -> Result<Package, RepositoryError> {
        let mut guard = self.packages.lock().expect("repository mutex poisoned");
        if guard.contains_key(&package.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(package.id.clone(), package.clone());
        Ok(package)
    }

    fn update_package(&self, package: Package) -> Result<(), RepositoryError> {
        let mut guard = self.packages.lock().expect("repository mutex poisoned");
        if guard.contains_key(&package.id) {
            guard.insert(package.id.clone(), package);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_package(&self, id: &PackageId) -> Result<Option<Package>, RepositoryError> {
        let guard = self.packages.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn packages(&self) -> Result<Vec<Package>, RepositoryError> {
        let guard = self.packages.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn insert_client_package(
        &self,
        client_package: ClientPackage,
    ) -> Result<ClientPackage, RepositoryError> {
        let mut guard = self.client_packages.lock().expect("repository mutex poisoned");
        if guard.contains_key(&client_package.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(client_package.id.clone(), client_package.clone());
        Ok(client_package)
    }

    fn update_client_package(&self, client_package: ClientPackage) -> Result<(), RepositoryError> {
        let mut guard = self.client_packages.lock().expect("repository mutex poisoned");
        if guard.contains_key(&client_package.id) {
            guard.insert(client_package.id.clone(), client_package);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_client_package(
        &self,
        id: &ClientPackageId,
    ) -> Result<Option<ClientPackage>, RepositoryError> {
        let guard = self.client_packages.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn client_packages_for(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<ClientPackage>, RepositoryError> {
        let guard = self.client_packages.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|cycle| &cycle.client_id == client_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryWaitingListRepository {
    entries: Arc<Mutex<HashMap<WaitingListEntryId, WaitingListEntry>>>,
}

impl WaitingListRepository for InMemoryWaitingListRepository {
    fn insert(&self, entry: WaitingListEntry) -> Result<WaitingListEntry, RepositoryError> {
        let mut guard = self.entries.lock().expect("repository mutex poisoned");
        if guard.contains_key(&entry.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    fn update(&self, entry: WaitingListEntry) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock().expect("repository mutex poisoned");
        if guard.contains_key(&entry.id) {
            guard.insert(entry.id.clone(), entry);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &WaitingListEntryId) -> Result<Option<WaitingListEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &WaitingListEntryId) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock().expect("repository mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn all(&self) -> Result<Vec<WaitingListEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRosterRepository {
    clients: Arc<Mutex<HashMap<ClientId, Client>>>,
    coaches: Arc<Mutex<HashMap<CoachId, Coach>>>,
}

impl RosterRepository for InMemoryRosterRepository {
    fn insert_client(&self, client: Client) -> Result<Client, RepositoryError> {
        let mut guard = self.clients.lock().expect("repository mutex poisoned");
        if guard.contains_key(&client.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(client.id.clone(), client.clone());
        Ok(client)
    }

    fn fetch_client(&self, id: &ClientId) -> Result<Option<Client>, RepositoryError> {
        let guard = self.clients.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn insert_coach(&self, coach: Coach) -> Result<Coach, RepositoryError> {
        let mut guard = self.coaches.lock().expect("repository mutex poisoned");
        if guard.contains_key(&coach.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(coach.id.clone(), coach.clone());
        Ok(coach)
    }

    fn coaches(&self, studio_id: &StudioId) -> Result<Vec<Coach>, RepositoryError> {
        let guard = self.coaches.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|coach| &coach.studio_id == studio_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, session: Session) -> Result<Session, RepositoryError> {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        if guard.contains_key(&session.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        let guard = self.sessions.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_coach(&self, coach_id: &CoachId) -> Result<Vec<Session>, RepositoryError> {
        let guard = self.sessions.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|session| &session.coach_id == coach_id)
            .cloned()
            .collect())
    }

    fn for_room(&self, room_id: &RoomId) -> Result<Vec<Session>, RepositoryError> {
        let guard = self.sessions.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|session| &session.room_id == room_id)
            .cloned()
            .collect())
    }
}

/// Notifier that logs each message and keeps it for inspection.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotifier {
    events: Arc<Mutex<Vec<ClientNotification>>>,
}

impl Notifier for LoggingNotifier {
    fn notify(&self, notification: ClientNotification) -> Result<(), NotificationError> {
        info!(
            template = %notification.template,
            client_id = %notification.client_id,
            entry_id = %notification.entry_id,
            "client notification queued"
        );
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl LoggingNotifier {
    pub(crate) fn events(&self) -> Vec<ClientNotification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
