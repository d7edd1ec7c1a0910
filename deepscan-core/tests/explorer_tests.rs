// Tests for UI state exploration

mod common;

use common::{FakeElement, FakeNavigator, FakePage, FakeSite};
use deepscan_core::{ExplorerOptions, ScanProfile, StateExplorer, StateName};
use deepscan_scanner::{GotoOptions, Locator, Navigator};
use std::time::Duration;

const URL: &str = "https://example.com/";

fn explorer() -> StateExplorer {
    StateExplorer::new(ExplorerOptions {
        action_timeout: Duration::from_secs(1),
        settle_delay: Duration::ZERO,
    })
}

async fn loaded(page: FakePage) -> FakeNavigator {
    let mut nav = FakeNavigator::new(FakeSite::new().page(URL, page));
    nav.goto(URL, &GotoOptions::default()).await.unwrap();
    nav
}

fn busy_page() -> FakePage {
    FakePage::new("Busy")
        .element(FakeElement::new(Locator::Text { tag: "button", text: "Got it" }))
        .element(FakeElement::new(Locator::Css(".menu-toggle")).attr("aria-expanded", "false"))
        .element(FakeElement::new(Locator::Css("[data-bs-toggle='modal']")))
        .element(FakeElement::new(Locator::Css("[role='tab'][aria-selected='false']")))
}

// ============================================================================
// Profile Gating
// ============================================================================

#[tokio::test]
async fn test_quick_profile_has_only_default() {
    let mut nav = loaded(busy_page()).await;
    let result = explorer().explore(&mut nav, ScanProfile::Quick).await;

    assert_eq!(result.total_states, 1);
    assert_eq!(result.states[0].name, StateName::Default);
    assert!(result.states[0].success);
    assert!(nav.journal().clicks().is_empty());
}

#[tokio::test]
async fn test_standard_profile_adds_cookie_state() {
    let mut nav = loaded(busy_page()).await;
    let result = explorer().explore(&mut nav, ScanProfile::Standard).await;

    let names: Vec<StateName> = result.states.iter().map(|s| s.name).collect();
    assert_eq!(names, vec![StateName::Default, StateName::CookiesDismissed]);
    assert!(result.states[1].success);
    assert_eq!(nav.journal().clicks(), vec!["button:has-text(\"Got it\")"]);
}

#[tokio::test]
async fn test_deep_profile_walks_all_steps() {
    let mut nav = loaded(busy_page()).await;
    let result = explorer().explore(&mut nav, ScanProfile::Deep).await;

    let names: Vec<StateName> = result.states.iter().map(|s| s.name).collect();
    assert_eq!(
        names,
        vec![
            StateName::Default,
            StateName::CookiesDismissed,
            StateName::MenuOpen,
            StateName::ModalOpen,
        ]
    );
    assert_eq!(result.total_states, 4);
    assert!(result.states.iter().all(|s| s.success));
}

// ============================================================================
// Individual Transitions
// ============================================================================

#[tokio::test]
async fn test_missing_cookie_banner_is_recorded_as_unsuccessful() {
    let mut nav = loaded(FakePage::new("Plain")).await;
    let result = explorer().explore(&mut nav, ScanProfile::Standard).await;

    assert_eq!(result.total_states, 2);
    assert_eq!(result.states[1].name, StateName::CookiesDismissed);
    assert!(!result.states[1].success);
}

#[tokio::test]
async fn test_cookie_selector_priority() {
    let page = FakePage::new("Consent")
        .element(FakeElement::new(Locator::Text { tag: "button", text: "Accept" }))
        .element(FakeElement::new(Locator::Css("#onetrust-accept-btn-handler")));
    let mut nav = loaded(page).await;

    explorer().explore(&mut nav, ScanProfile::Standard).await;
    assert_eq!(nav.journal().clicks(), vec!["#onetrust-accept-btn-handler"]);
}

#[tokio::test]
async fn test_failed_cookie_click_is_unsuccessful() {
    let page = FakePage::new("Stuck")
        .element(FakeElement::new(Locator::Css("[id*='cookie'] button")).unclickable());
    let mut nav = loaded(page).await;

    let result = explorer().explore(&mut nav, ScanProfile::Standard).await;
    assert!(!result.states[1].success);
}

#[tokio::test]
async fn test_already_expanded_menu_is_not_clicked() {
    let page = FakePage::new("Menu")
        .element(FakeElement::new(Locator::Css("nav button")).attr("aria-expanded", "true"));
    let mut nav = loaded(page).await;

    let result = explorer().explore(&mut nav, ScanProfile::Deep).await;
    let menu = result
        .states
        .iter()
        .find(|s| s.name == StateName::MenuOpen)
        .unwrap();
    assert!(menu.success);
    assert!(nav.journal().clicks().is_empty());
}

#[tokio::test]
async fn test_missing_menu_is_unsuccessful_but_recorded() {
    let mut nav = loaded(FakePage::new("No menu")).await;
    let result = explorer().explore(&mut nav, ScanProfile::Deep).await;

    let menu = result
        .states
        .iter()
        .find(|s| s.name == StateName::MenuOpen)
        .unwrap();
    assert!(!menu.success);
}

#[tokio::test]
async fn test_interactive_slot_omitted_when_nothing_opens() {
    let mut nav = loaded(FakePage::new("Static")).await;
    let result = explorer().explore(&mut nav, ScanProfile::Deep).await;

    assert_eq!(result.total_states, 3);
    assert!(result.states.iter().all(|s| !matches!(
        s.name,
        StateName::ModalOpen | StateName::AccordionOpen | StateName::TabSwitched
    )));
}

#[tokio::test]
async fn test_interactive_falls_through_to_accordion() {
    let page = FakePage::new("FAQ")
        .element(FakeElement::new(Locator::Css("[data-toggle='modal']")).unclickable())
        .element(FakeElement::new(Locator::Css(".accordion-button[aria-expanded='false']")))
        .element(FakeElement::new(Locator::Css("[role='tab'][aria-selected='false']")));
    let mut nav = loaded(page).await;

    let result = explorer().explore(&mut nav, ScanProfile::Deep).await;
    assert_eq!(result.states.last().unwrap().name, StateName::AccordionOpen);
    assert_eq!(
        nav.journal().clicks(),
        vec![".accordion-button[aria-expanded='false']"]
    );
}

#[tokio::test]
async fn test_interactive_uses_tab_when_only_tabs_exist() {
    let page = FakePage::new("Tabs")
        .element(FakeElement::new(Locator::Css("[role='tab'][aria-selected='false']")));
    let mut nav = loaded(page).await;

    let result = explorer().explore(&mut nav, ScanProfile::Deep).await;
    assert_eq!(result.states.last().unwrap().name, StateName::TabSwitched);
}

#[tokio::test]
async fn test_deep_never_exceeds_four_states() {
    let page = busy_page()
        .element(FakeElement::new(Locator::Css(".accordion-button[aria-expanded='false']")));
    let mut nav = loaded(page).await;

    let result = explorer().explore(&mut nav, ScanProfile::Deep).await;
    assert!(result.total_states <= 4);
    assert_eq!(result.states[0].name, StateName::Default);
}
