use ellarises::db::{
    DonationInput, EventOccurrenceInput, EventTemplateInput, MilestoneInput, ParticipantInput,
    Store, SurveyInput,
};

async fn test_store() -> Store {
    Store::new("sqlite::memory:")
        .await
        .expect("Failed to open in-memory store")
}

fn participant(email: &str, first: &str, city: Option<&str>) -> ParticipantInput {
    ParticipantInput {
        email: email.to_string(),
        first_name: first.to_string(),
        last_name: "Test".to_string(),
        date_of_birth: None,
        role: None,
        phone: None,
        city: city.map(str::to_string),
        state: None,
        zip: None,
    }
}

#[tokio::test]
async fn test_seeded_users_can_authenticate() {
    let store = test_store().await;

    assert!(store.verify_user_password("admin", "admin123").await.unwrap());
    assert!(!store.verify_user_password("admin", "wrong").await.unwrap());
    assert!(!store.verify_user_password("nobody", "admin123").await.unwrap());

    let admin = store.get_user_by_username("admin").await.unwrap().unwrap();
    assert_eq!(admin.role, "M");
    let user = store.get_user_by_username("user").await.unwrap().unwrap();
    assert_eq!(user.role, "U");
}

#[tokio::test]
async fn test_participant_upsert_then_get_roundtrip() {
    let store = test_store().await;

    store
        .save_participant(None, &participant("r@x.com", "Rita", Some("Provo")))
        .await
        .unwrap();

    let fetched = store.get_participant("r@x.com").await.unwrap().unwrap();
    assert_eq!(fetched.email, "r@x.com");
    assert_eq!(fetched.first_name, "Rita");
    assert_eq!(fetched.city.as_deref(), Some("Provo"));
    assert_eq!(fetched.phone, None);
}

#[tokio::test]
async fn test_update_by_original_key_touches_only_that_row() {
    let store = test_store().await;

    store
        .save_participant(None, &participant("a@x.com", "Ana", Some("Provo")))
        .await
        .unwrap();
    store
        .save_participant(None, &participant("b@x.com", "Ben", Some("Orem")))
        .await
        .unwrap();

    store
        .save_participant(Some("a@x.com"), &participant("a@y.org", "Ana", Some("Lehi")))
        .await
        .unwrap();

    assert!(store.get_participant("a@x.com").await.unwrap().is_none());
    let moved = store.get_participant("a@y.org").await.unwrap().unwrap();
    assert_eq!(moved.city.as_deref(), Some("Lehi"));

    let untouched = store.get_participant("b@x.com").await.unwrap().unwrap();
    assert_eq!(untouched.first_name, "Ben");
    assert_eq!(untouched.city.as_deref(), Some("Orem"));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = test_store().await;

    assert!(!store.delete_participant("ghost@x.com").await.unwrap());

    store
        .save_participant(None, &participant("g@x.com", "Gil", None))
        .await
        .unwrap();
    assert!(store.delete_participant("g@x.com").await.unwrap());
    assert!(!store.delete_participant("g@x.com").await.unwrap());
    assert!(store.get_participant("g@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_search_term_semantics() {
    let store = test_store().await;

    store
        .save_participant(None, &participant("alice@x.com", "Alice", Some("Provo")))
        .await
        .unwrap();
    store
        .save_participant(None, &participant("bob@x.com", "Bob", Some("Orem")))
        .await
        .unwrap();

    let unfiltered = store.list_participants(None).await.unwrap();
    let blank = store.list_participants(Some("")).await.unwrap();
    assert_eq!(unfiltered.len(), 2);
    assert_eq!(blank.len(), unfiltered.len());

    let hit = store.list_participants(Some("proVO")).await.unwrap();
    assert_eq!(hit.len(), 1);
    assert_eq!(hit[0].email, "alice@x.com");

    let miss = store.list_participants(Some("xyzzy")).await.unwrap();
    assert!(miss.is_empty());
}

#[tokio::test]
async fn test_milestone_rekey_moves_the_record() {
    let store = test_store().await;

    let input = MilestoneInput {
        participant_email: "a@x.com".to_string(),
        achieved_on: "2024-01-01".to_string(),
        title: "Graduated".to_string(),
    };
    store.save_milestone(None, &input).await.unwrap();

    let moved = MilestoneInput {
        achieved_on: "2024-02-01".to_string(),
        ..input
    };
    store
        .save_milestone(Some(("a@x.com", "2024-01-01")), &moved)
        .await
        .unwrap();

    assert!(
        store
            .get_milestone("a@x.com", "2024-01-01")
            .await
            .unwrap()
            .is_none()
    );
    let fetched = store
        .get_milestone("a@x.com", "2024-02-01")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.title, "Graduated");
}

#[tokio::test]
async fn test_donation_amount_is_stored_numeric() {
    let store = test_store().await;

    let input = DonationInput {
        participant_email: "d@x.com".to_string(),
        donated_on: "2024-03-01".to_string(),
        amount: 50.00,
    };
    store.save_donation(None, &input).await.unwrap();

    let fetched = store
        .get_donation("d@x.com", "2024-03-01")
        .await
        .unwrap()
        .unwrap();
    assert!((fetched.amount - 50.00).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_survey_blank_scores_persist_as_null() {
    let store = test_store().await;

    let input = SurveyInput {
        participant_email: "s@x.com".to_string(),
        event_name: "Art Night".to_string(),
        occurrence_start: Some("2024-06-23 10:00".to_string()),
        satisfaction_score: Some(4.5),
        usefulness_score: None,
        instructor_score: None,
        recommendation_score: None,
        overall_score: Some(5.0),
        nps_bucket: Some("Promoter".to_string()),
        comments: None,
    };
    store.save_survey(None, &input).await.unwrap();

    let surveys = store.list_surveys(None).await.unwrap();
    assert_eq!(surveys.len(), 1);
    let survey = &surveys[0];
    assert_eq!(survey.satisfaction_score, Some(4.5));
    assert_eq!(survey.usefulness_score, None);
    assert_eq!(survey.occurrence_start.as_deref(), Some("2024-06-23 10:00"));
    assert!(!survey.submitted_at.is_empty());

    // An id-keyed update rewrites fields but not the submission stamp
    let updated = SurveyInput {
        comments: Some("Great".to_string()),
        ..input
    };
    store.save_survey(Some(survey.id), &updated).await.unwrap();
    let fetched = store.get_survey(survey.id).await.unwrap().unwrap();
    assert_eq!(fetched.comments.as_deref(), Some("Great"));
    assert_eq!(fetched.submitted_at, survey.submitted_at);
}

#[tokio::test]
async fn test_deleting_a_template_leaves_occurrences() {
    let store = test_store().await;

    let template = EventTemplateInput {
        name: "Art Night".to_string(),
        event_type: Some("Workshop".to_string()),
        description: None,
        recurrence: Some("weekly".to_string()),
        default_capacity: Some(25),
    };
    store.save_event_template(None, &template).await.unwrap();
    assert!(store.event_template_exists("Art Night").await.unwrap());

    let occurrence = EventOccurrenceInput {
        template_name: "Art Night".to_string(),
        starts_at: "2024-06-23 10:00".to_string(),
        ends_at: Some("2024-06-23 12:00".to_string()),
        location: Some("Community Center".to_string()),
        capacity: None,
        registration_deadline: None,
    };
    store.save_event_occurrence(None, &occurrence).await.unwrap();

    assert!(store.delete_event_template("Art Night").await.unwrap());
    assert!(!store.event_template_exists("Art Night").await.unwrap());

    let occurrences = store.list_event_occurrences(None).await.unwrap();
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].template_name, "Art Night");
}

#[tokio::test]
async fn test_dashboard_counts_track_rows() {
    let store = test_store().await;

    let counts = store.dashboard_counts().await.unwrap();
    assert_eq!(counts.participants, 0);
    assert_eq!(counts.donations, 0);

    store
        .save_participant(None, &participant("c@x.com", "Cam", None))
        .await
        .unwrap();
    store
        .save_donation(
            None,
            &DonationInput {
                participant_email: "c@x.com".to_string(),
                donated_on: "2024-01-02".to_string(),
                amount: 10.0,
            },
        )
        .await
        .unwrap();

    let counts = store.dashboard_counts().await.unwrap();
    assert_eq!(counts.participants, 1);
    assert_eq!(counts.donations, 1);
}
