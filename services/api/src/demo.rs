use crate::infra::{parse_date, StudioServices};
use chrono::{Duration, Local, NaiveDate, TimeZone, Utc};
use clap::Args;
use ems_studio::config::LedgerConfig;
use ems_studio::error::AppError;
use ems_studio::workflows::packages::{AssignPackage, ClientPackage, NewPackage, RenewPackage};
use ems_studio::workflows::roster::{
    Client, ClientId, Coach, CoachGenderPreference, CoachId, Gender, StudioId,
};
use ems_studio::workflows::scheduling::{RoomId, SessionRequest};
use ems_studio::workflows::transactions::{NewTransaction, PaymentMethod, TransactionType};
use ems_studio::workflows::waiting_list::{QueueFilter, WaitingListRequest};
use rust_decimal::Decimal;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Business day the walkthrough runs on (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the waiting-list and booking portion of the demo.
    #[arg(long)]
    pub(crate) skip_waiting_list: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let services = StudioServices::in_memory(&LedgerConfig::default());
    let studio = StudioId("downtown".to_string());

    println!("EMS studio back office demo ({today})");
    if let Err(err) = seed_roster(&services, &studio) {
        println!("  Roster setup failed: {err}");
        return Ok(());
    }

    println!("\nPackage credit ledger");
    let cycle = match package_walkthrough(&services, today) {
        Ok(cycle) => cycle,
        Err(err) => {
            println!("  Package walkthrough stopped: {err}");
            return Ok(());
        }
    };
    println!(
        "- Active cycle {} | {} used / {} remaining | expires {}",
        cycle.id, cycle.sessions_used, cycle.sessions_remaining, cycle.expiry_date
    );

    if !args.skip_waiting_list {
        println!("\nWaiting list");
        if let Err(err) = waiting_list_walkthrough(&services, &studio, today) {
            println!("  Waiting list walkthrough stopped: {err}");
        }
    }

    println!("\nCash-flow ledger");
    if let Err(err) = ledger_walkthrough(&services, today) {
        println!("  Ledger walkthrough stopped: {err}");
    }

    Ok(())
}

fn seed_roster(services: &StudioServices, studio: &StudioId) -> Result<(), String> {
    let clients = [
        ("client-anna", "Anna Weber", Gender::Female),
        ("client-ben", "Ben Novak", Gender::Male),
    ];
    for (id, name, gender) in clients {
        services
            .roster
            .register_client(Client {
                id: ClientId(id.to_string()),
                studio_id: studio.clone(),
                name: name.to_string(),
                gender,
            })
            .map_err(|err| err.to_string())?;
    }

    let coaches = [
        ("coach-lea", "Lea Brandt", CoachGenderPreference::Female),
        ("coach-tom", "Tom Keller", CoachGenderPreference::Any),
    ];
    for (id, name, preference) in coaches {
        services
            .roster
            .register_coach(Coach {
                id: CoachId(id.to_string()),
                studio_id: studio.clone(),
                name: name.to_string(),
                preferred_client_gender: preference,
                is_active: true,
            })
            .map_err(|err| err.to_string())?;
    }
    println!("- Registered {} clients and {} coaches", clients.len(), coaches.len());
    Ok(())
}

fn package_walkthrough(
    services: &StudioServices,
    today: NaiveDate,
) -> Result<ClientPackage, String> {
    let ledger = &services.packages;
    let package = ledger
        .create_package(NewPackage {
            name: "Ten EMS sessions".to_string(),
            total_sessions: 10,
            price: Decimal::new(45000, 2),
            validity_days: 90,
        })
        .map_err(|err| err.to_string())?;
    println!(
        "- Catalog: {} ({} sessions, {} EUR, {} days)",
        package.name, package.total_sessions, package.price, package.validity_days
    );

    let purchase_date = today - Duration::days(30);
    let cycle = ledger
        .assign(AssignPackage {
            client_id: ClientId("client-anna".to_string()),
            package_id: package.id.clone(),
            payment_method: Some(PaymentMethod::Card),
            purchase_date,
        })
        .map_err(|err| err.to_string())?;
    println!("- Sold {} to {} on {}", package.name, cycle.client_id, purchase_date);

    for _ in 0..10 {
        ledger
            .use_session(&cycle.id, today)
            .map_err(|err| err.to_string())?;
    }
    let depleted = ledger.get(&cycle.id, today).map_err(|err| err.to_string())?;
    println!(
        "- After 10 sessions: status {} ({} remaining)",
        depleted.status, depleted.sessions_remaining
    );
    if let Err(err) = ledger.use_session(&cycle.id, today) {
        println!("- 11th session refused: {err}");
    }

    let renewed = ledger
        .renew(
            &cycle.id,
            RenewPackage {
                package_id: None,
                payment_method: None,
                purchase_date: today,
            },
        )
        .map_err(|err| err.to_string())?;
    println!(
        "- Renewed into {} (sale pending payment)",
        renewed.id
    );

    let adjusted = ledger
        .adjust_sessions(&renewed.id, 1, "goodwill session after equipment fault")
        .map_err(|err| err.to_string())?;
    ledger
        .use_session(&adjusted.id, today)
        .map_err(|err| err.to_string())
}

fn waiting_list_walkthrough(
    services: &StudioServices,
    studio: &StudioId,
    today: NaiveDate,
) -> Result<(), String> {
    let queue = &services.waiting_list;
    let preferred_date = today + Duration::days(2);
    let requests = [("client-ben", 2), ("client-anna", 1)];
    for (client, priority) in requests {
        queue
            .request(WaitingListRequest {
                client_id: ClientId(client.to_string()),
                studio_id: studio.clone(),
                priority: Some(priority),
                preferred_date: Some(preferred_date),
                preferred_slot: Some("18:00-18:30".to_string()),
                notes: None,
            })
            .map_err(|err| err.to_string())?;
    }

    let filter = QueueFilter {
        studio_id: Some(studio.clone()),
        status: None,
    };
    let entries = queue.list(&filter).map_err(|err| err.to_string())?;
    for entry in &entries {
        println!(
            "- #{} {} priority {} -> {}",
            entry.sequence, entry.client_id, entry.priority, entry.status
        );
    }

    let Some(head) = entries.first() else {
        return Ok(());
    };
    queue.approve(&head.id).map_err(|err| err.to_string())?;
    queue.notify(&head.id).map_err(|err| err.to_string())?;
    println!(
        "- Notified {} ({} message(s) sent)",
        head.client_id,
        services.notifier.events().len()
    );

    let coaches = services
        .roster
        .eligible_coaches(studio, &head.client_id)
        .map_err(|err| err.to_string())?;
    let Some(coach) = coaches.first() else {
        println!("- No eligible coach for {}", head.client_id);
        return Ok(());
    };

    let start = preferred_date
        .and_hms_opt(18, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| "invalid slot start".to_string())?;
    let session = services
        .scheduling
        .book(SessionRequest {
            client_id: head.client_id.clone(),
            coach_id: coach.id.clone(),
            room_id: RoomId("room-1".to_string()),
            studio_id: studio.clone(),
            start_time: start,
            end_time: start + Duration::minutes(30),
            waiting_list_entry_id: Some(head.id.clone()),
        })
        .map_err(|err| err.to_string())?;
    let booked = queue
        .mark_as_booked(&head.id)
        .map_err(|err| err.to_string())?;
    println!(
        "- Booked session {} with {} -> entry {}",
        session.id.0, coach.name, booked.status
    );
    Ok(())
}

fn ledger_walkthrough(services: &StudioServices, today: NaiveDate) -> Result<(), String> {
    let ledger = &services.transactions;
    let movements = [
        (TransactionType::Expense, "rent", Decimal::new(120000, 2)),
        (TransactionType::Refund, "package_sale", Decimal::new(4500, 2)),
    ];
    for (kind, category, amount) in movements {
        ledger
            .create(NewTransaction {
                kind,
                category: category.to_string(),
                amount,
                description: format!("demo {}", kind.label()),
                payment_method: Some(PaymentMethod::BankTransfer),
                occurred_on: today,
                reference: None,
            })
            .map_err(|err| err.to_string())?;
    }

    let window = ledger.default_window(today);
    for row in ledger.ledger(&window).map_err(|err| err.to_string())? {
        println!(
            "- {} {:<7} {:<12} {:>9} {:<7} balance {}",
            row.record.occurred_on,
            row.record.kind.label(),
            row.record.category,
            row.record.amount,
            row.record.status.label(),
            row.running_balance
        );
    }
    let summary = ledger.summary(&window).map_err(|err| err.to_string())?;
    println!(
        "- Net {} (income {} | expense {} | refund {}) with {} pending",
        summary.net, summary.income, summary.expense, summary.refund, summary.pending
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ems_studio::workflows::packages::ClientPackageStatus;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date")
    }

    #[test]
    fn package_walkthrough_ends_on_an_active_renewed_cycle() {
        let services = StudioServices::in_memory(&LedgerConfig::default());
        let studio = StudioId("downtown".to_string());
        seed_roster(&services, &studio).expect("roster seeds");

        let cycle = package_walkthrough(&services, day()).expect("walkthrough completes");

        assert_eq!(cycle.status, ClientPackageStatus::Active);
        assert_eq!(cycle.sessions_used, 1);
        assert_eq!(cycle.sessions_remaining, 10);
        assert!(cycle.renewed_from.is_some());
    }

    #[test]
    fn waiting_list_walkthrough_books_highest_priority_client() {
        let services = StudioServices::in_memory(&LedgerConfig::default());
        let studio = StudioId("downtown".to_string());
        seed_roster(&services, &studio).expect("roster seeds");

        waiting_list_walkthrough(&services, &studio, day()).expect("walkthrough completes");

        let events = services.notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].client_id, ClientId("client-anna".to_string()));
        let sessions = services
            .scheduling
            .for_coach(&CoachId("coach-lea".to_string()))
            .expect("sessions listed");
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn demo_runs_end_to_end() {
        run_demo(DemoArgs {
            today: Some(day()),
            skip_waiting_list: false,
        })
        .expect("demo completes");
    }
}
