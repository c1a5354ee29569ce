//! Workflow behavior against the scripted fake driver.

use std::sync::Arc;

use nordbook::driver::fake::{FakeController, FakeDriver, FakeDriverBuilder, FakePage, Interaction};
use nordbook::{
    BookingError, BookingService, Credentials, Discipline, ReservationOutcome, SiteConfig,
};

const RECEIPT_CELL: &str = "Tilmelding<br>Badminton - DGI Hallen<br>Man 22-11-2021<br>06:00 - 07:00<br>06:00 - 07:00<br>Idrætslokaler niv. 3: DGI Hallen";

fn build(builder: FakeDriverBuilder) -> (BookingService, FakeController) {
    let (driver, controller) = builder.build();
    let service = BookingService::new(Arc::new(driver), SiteConfig::default());
    (service, controller)
}

fn site() -> SiteConfig {
    SiteConfig::default()
}

fn nav_timeout() -> BookingError {
    BookingError::NavigationTimeout { ms: 10_000 }
}

fn element_missing(locator: &str) -> BookingError {
    BookingError::ElementNotFound {
        locator: locator.into(),
    }
}

#[tokio::test]
async fn probe_reports_logged_in_without_redirect() {
    let (service, controller) =
        build(FakeDriver::builder().page(FakePage::at(site().profile_page_url)));

    assert!(service.check_logged_in().await.unwrap());
    assert_eq!(controller.opened(), 1);
    assert_eq!(controller.closed(), 1);
}

#[tokio::test]
async fn probe_reports_logged_out_on_redirect() {
    let (service, controller) = build(
        FakeDriver::builder()
            .page(FakePage::at("https://clipnfitnordkraft.halbooking.dk/newlook/proc_side.asp?s=login")),
    );

    assert!(!service.check_logged_in().await.unwrap());
    assert_eq!(controller.opened(), controller.closed());
}

#[tokio::test]
async fn login_accepts_on_the_logged_in_landing_url() {
    let (service, controller) =
        build(FakeDriver::builder().page(FakePage::at(site().logged_in_page_url)));

    let credentials = Credentials::new("mikkel", "hunter2");
    assert!(service.login(&credentials).await.unwrap());

    let fills: Vec<_> = controller
        .interactions()
        .await
        .into_iter()
        .filter_map(|interaction| match interaction {
            Interaction::Fill { element, value } => Some((element, value)),
            _ => None,
        })
        .collect();

    // Username and password each reach exactly one field, in that order.
    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].1, "mikkel");
    assert_eq!(fills[1].1, "hunter2");
    assert_ne!(fills[0].0, fills[1].0);

    assert_eq!(controller.opened(), 1);
    assert_eq!(controller.closed(), 1);
}

#[tokio::test]
async fn login_rejects_anywhere_else_without_raising() {
    let (service, controller) =
        build(FakeDriver::builder().page(FakePage::at(site().home_page_url)));

    let credentials = Credentials::new("mikkel", "wrong");
    assert!(!service.login(&credentials).await.unwrap());
    assert_eq!(controller.opened(), controller.closed());
}

#[tokio::test]
async fn login_submit_awaits_the_navigation_after_the_click() {
    let (service, controller) =
        build(FakeDriver::builder().page(FakePage::at(site().logged_in_page_url)));

    service
        .login(&Credentials::new("mikkel", "hunter2"))
        .await
        .unwrap();

    let interactions = controller.interactions().await;
    let submit_click = interactions
        .iter()
        .rposition(|interaction| matches!(interaction, Interaction::Click(_)))
        .unwrap();
    // The click and the navigation wait are two separate protocol steps.
    assert_eq!(interactions[submit_click + 1], Interaction::AwaitNavigation);
}

#[tokio::test]
async fn login_faults_when_the_modal_never_renders() {
    let (service, controller) = build(
        FakeDriver::builder().page(
            FakePage::at(site().home_page_url)
                // Trigger resolves, the username input never does.
                .wait_outcome(Ok(()))
                .wait_outcome(Err(element_missing("css=[id$=\"loginname\"]"))),
        ),
    );

    let err = service
        .login(&Credentials::new("mikkel", "hunter2"))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::ElementNotFound { .. }));
    assert_eq!(controller.opened(), 1);
    assert_eq!(controller.closed(), 1);
}

#[tokio::test]
async fn login_surfaces_submit_timeout_and_still_releases_the_page() {
    let (service, controller) = build(
        FakeDriver::builder()
            .page(FakePage::at(site().home_page_url).navigation_outcome(Err(nav_timeout()))),
    );

    let err = service
        .login(&Credentials::new("mikkel", "hunter2"))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::NavigationTimeout { .. }));
    assert_eq!(controller.opened(), 1);
    assert_eq!(controller.closed(), 1);
}

#[tokio::test]
async fn profile_is_a_normal_result_when_logged_out() {
    let (service, controller) =
        build(FakeDriver::builder().page(FakePage::at(site().home_page_url)));

    let status = service.login_status().await.unwrap();
    assert!(!status.is_logged_in);
    assert!(status.profile.is_none());
    assert_eq!(controller.opened(), 1);
    assert_eq!(controller.closed(), 1);
}

#[tokio::test]
async fn profile_reads_the_labeled_fields() {
    let (service, controller) = build(
        FakeDriver::builder()
            .page(FakePage::at(site().profile_page_url))
            .page(
                FakePage::at(site().profile_page_url)
                    .value(Some("Mikkel B"))
                    .value(Some("mikkel")),
            ),
    );

    let status = service.login_status().await.unwrap();
    let profile = status.profile.unwrap();
    assert_eq!(profile.profile_name, "Mikkel B");
    assert_eq!(profile.username, "mikkel");
    assert_eq!(controller.opened(), 2);
    assert_eq!(controller.closed(), 2);
}

#[tokio::test]
async fn profile_degrades_absent_fields_to_the_sentinel() {
    let (service, _controller) = build(
        FakeDriver::builder()
            .page(FakePage::at(site().profile_page_url))
            .page(FakePage::at(site().profile_page_url)),
    );

    let profile = service.login_status().await.unwrap().profile.unwrap();
    assert_eq!(profile.profile_name, "N/A");
    assert_eq!(profile.username, "N/A");
}

#[tokio::test]
async fn reservation_confirms_on_the_receipt_page() {
    let (service, controller) = build(
        FakeDriver::builder()
            .page(FakePage::at(site().profile_page_url))
            .page(FakePage::at(site().receipt_page_url).cell_html(RECEIPT_CELL)),
    );

    let outcome = service
        .make_reservation("https://clipnfitnordkraft.halbooking.dk/newlook/proc_baner.asp?slot=42")
        .await
        .unwrap();

    let ReservationOutcome::Confirmed { receipt } = outcome else {
        panic!("expected a confirmed reservation, got {outcome:?}");
    };
    assert_eq!(receipt.discipline, "Badminton");
    assert_eq!(receipt.date, "Man 22-11-2021");
    assert_eq!(receipt.time, "06:00 - 07:00");
    assert_eq!(receipt.location, "Idrætslokaler niv. 3: DGI Hallen");

    assert_eq!(controller.opened(), 2);
    assert_eq!(controller.closed(), 2);
}

#[tokio::test]
async fn reservation_is_absent_off_the_receipt_page() {
    let (service, controller) = build(
        FakeDriver::builder()
            .page(FakePage::at(site().profile_page_url))
            .page(FakePage::at(site().home_page_url).cell_html(RECEIPT_CELL)),
    );

    let outcome = service
        .make_reservation("https://clipnfitnordkraft.halbooking.dk/newlook/proc_baner.asp?slot=42")
        .await
        .unwrap();
    assert_eq!(outcome, ReservationOutcome::NotConfirmed);
    assert_eq!(controller.opened(), controller.closed());
}

#[tokio::test]
async fn reservation_outcome_is_unknown_when_confirmation_never_settles() {
    let (service, controller) = build(
        FakeDriver::builder()
            .page(FakePage::at(site().profile_page_url))
            .page(
                FakePage::at(site().home_page_url)
                    .navigation_outcome(Ok(()))
                    .navigation_outcome(Err(nav_timeout())),
            ),
    );

    let outcome = service
        .make_reservation("https://clipnfitnordkraft.halbooking.dk/newlook/proc_baner.asp?slot=42")
        .await
        .unwrap();
    assert_eq!(outcome, ReservationOutcome::Unknown);
    assert_eq!(controller.opened(), 2);
    assert_eq!(controller.closed(), 2);
}

#[tokio::test]
async fn reservation_faults_on_the_first_gate_timeout() {
    let (service, controller) = build(
        FakeDriver::builder()
            .page(FakePage::at(site().profile_page_url))
            .page(FakePage::at(site().home_page_url).navigation_outcome(Err(nav_timeout()))),
    );

    let err = service
        .make_reservation("https://clipnfitnordkraft.halbooking.dk/newlook/proc_baner.asp?slot=42")
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::NavigationTimeout { .. }));
    assert_eq!(controller.opened(), 2);
    assert_eq!(controller.closed(), 2);
}

#[tokio::test]
async fn reservation_faults_when_an_affordance_label_changed() {
    let (service, controller) = build(
        FakeDriver::builder()
            .page(FakePage::at(site().profile_page_url))
            .page(
                FakePage::at(site().home_page_url)
                    .wait_outcome(Ok(()))
                    .wait_outcome(Err(element_missing("text=Bekræft tilmelding"))),
            ),
    );

    let err = service
        .make_reservation("https://clipnfitnordkraft.halbooking.dk/newlook/proc_baner.asp?slot=42")
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::ElementNotFound { .. }));
    assert_eq!(controller.opened(), 2);
    assert_eq!(controller.closed(), 2);
}

#[tokio::test]
async fn reservation_requires_an_authenticated_session() {
    let (service, controller) =
        build(FakeDriver::builder().page(FakePage::at(site().home_page_url)));

    let err = service
        .make_reservation("https://clipnfitnordkraft.halbooking.dk/newlook/proc_baner.asp?slot=42")
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Precondition(_)));
    assert_eq!(controller.opened(), 1);
    assert_eq!(controller.closed(), 1);
}

#[tokio::test]
async fn open_failure_hands_out_no_handle() {
    let (service, controller) = build(FakeDriver::builder().open_failure(nav_timeout()));

    let err = service.check_logged_in().await.unwrap_err();
    assert!(matches!(err, BookingError::NavigationTimeout { .. }));
    assert_eq!(controller.opened(), 0);
    assert_eq!(controller.closed(), 0);
}

#[tokio::test]
async fn timeslots_visit_the_listing_and_yield_nothing_yet() {
    let (service, controller) = build(
        FakeDriver::builder()
            .page(FakePage::at(site().profile_page_url))
            .page(FakePage::at("https://dgihusetnordkraft.dk/holdbeskrivelse/badminton/")),
    );

    let slots = service.list_timeslots(Discipline::Badminton).await.unwrap();
    assert!(slots.is_empty());
    assert_eq!(controller.opened(), 2);
    assert_eq!(controller.closed(), 2);
}

#[tokio::test]
async fn timeslots_reject_a_discipline_without_a_listing() {
    let (service, controller) =
        build(FakeDriver::builder().page(FakePage::at(site().profile_page_url)));

    let err = service
        .list_timeslots(Discipline::Styrketraening)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidParameter(_)));
    // Only the probe page was ever opened, and it was released.
    assert_eq!(controller.opened(), 1);
    assert_eq!(controller.closed(), 1);
}

#[tokio::test]
async fn timeslots_require_an_authenticated_session() {
    let (service, _controller) =
        build(FakeDriver::builder().page(FakePage::at(site().home_page_url)));

    let err = service
        .list_timeslots(Discipline::Badminton)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Precondition(_)));
}

#[tokio::test]
async fn screenshot_writes_the_capture_and_releases_the_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.png");

    let (service, controller) =
        build(FakeDriver::builder().page(FakePage::at(site().home_page_url)));

    service
        .screenshot(&site().home_page_url, &path)
        .await
        .unwrap();
    assert!(path.exists());
    assert_eq!(controller.opened(), 1);
    assert_eq!(controller.closed(), 1);
}
