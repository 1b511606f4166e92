//! Runs against a MongoDB container: `cargo test -- --ignored`

use chrono::{DateTime, Duration, TimeZone, Utc};
use domain_events::{
    Event, EventPatch, EventRepository, MongoEventRepository, NewEvent, Recurrence,
    RecurrenceType, Selection, SeriesId,
};
use test_utils::{TestDataBuilder, TestMongo};

fn t1() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap()
}

fn occurrence(builder: &TestDataBuilder, series_id: &SeriesId, start_time: DateTime<Utc>) -> Event {
    let mut event = NewEvent {
        title: "Standup".into(),
        description: None,
        start_time,
        end_time: None,
        participants: vec![builder.email("bob")],
        recurrence: Recurrence {
            kind: RecurrenceType::Daily,
            interval: Some(1),
            until: None,
        },
    }
    .into_event(builder.user_id(0));
    event.series_id = series_id.clone();
    event
}

async fn seeded(test_name: &str) -> (TestMongo, MongoEventRepository, TestDataBuilder, [Event; 3]) {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name(test_name);
    let repo = MongoEventRepository::new(&mongo.database(&builder.database_name()));
    repo.create_indexes().await.unwrap();

    let series = SeriesId::recurring();
    let events = [
        occurrence(&builder, &series, t1()),
        occurrence(&builder, &series, t1() + Duration::days(1)),
        occurrence(&builder, &series, t1() + Duration::days(2)),
    ];
    // insert out of order so listing has to sort
    for event in [&events[2], &events[0], &events[1]] {
        repo.create(event.clone()).await.unwrap();
    }

    (mongo, repo, builder, events)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn stored_event_reads_back_unchanged() {
    let (_mongo, repo, _, [first, _, _]) = seeded("stored_event_reads_back_unchanged").await;

    let fetched = repo.get_by_id(first.id).await.unwrap();
    assert_eq!(fetched, Some(first));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn series_from_selection_compares_start_times_chronologically() {
    let (_mongo, repo, builder, [first, second, _]) =
        seeded("series_from_selection_compares_start_times_chronologically").await;

    let deleted = repo
        .delete_many(&Selection::SeriesFrom {
            series_id: second.series_id.clone(),
            start_time: second.start_time,
        })
        .await
        .unwrap();
    assert_eq!(deleted, 2);

    let remaining = repo
        .find_visible(builder.user_id(0), "nobody@test.local")
        .await
        .unwrap();
    assert_eq!(remaining, vec![first]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn series_update_reports_matched_count() {
    let (_mongo, repo, builder, [first, _, _]) = seeded("series_update_reports_matched_count").await;

    let patch = EventPatch {
        title: Some("Daily sync".into()),
        ..Default::default()
    };
    let matched = repo
        .update_many(
            &Selection::Series {
                series_id: first.series_id.clone(),
            },
            &patch,
        )
        .await
        .unwrap();
    assert_eq!(matched, 3);

    let listed = repo
        .find_visible(builder.user_id(9), &builder.email("bob"))
        .await
        .unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed.iter().all(|e| e.title == "Daily sync"));
    assert!(listed.windows(2).all(|w| w[0].start_time < w[1].start_time));
}
