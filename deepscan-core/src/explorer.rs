// Per-page UI state exploration
//
// A page walks a fixed, linear list of transitions gated by the scan profile.
// Each transition gets one attempt; nothing is retried.

use crate::config::ScanProfile;
use crate::model::{PageState, StateName};
use deepscan_scanner::{Locator, Navigator};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

pub const COOKIE_ACCEPT_LOCATORS: &[Locator] = &[
    Locator::Css("#onetrust-accept-btn-handler"),
    Locator::Css("[id*='cookie'] button"),
    Locator::Css("[class*='cookie'] button"),
    Locator::Css("[id*='consent'] button"),
    Locator::Css("[class*='consent'] button"),
    Locator::Css("button[aria-label*='accept']"),
    Locator::Css("button[aria-label*='Accept']"),
    Locator::Css("button[aria-label*='consent']"),
    Locator::Text { tag: "button", text: "Accept" },
    Locator::Text { tag: "button", text: "Accept all" },
    Locator::Text { tag: "button", text: "Got it" },
    Locator::Text { tag: "button", text: "OK" },
    Locator::Text { tag: "button", text: "I agree" },
];

pub const MENU_TOGGLE_LOCATORS: &[Locator] = &[
    Locator::Css("button[aria-controls*='menu']"),
    Locator::Css("button[aria-controls*='nav']"),
    Locator::Css("button[aria-label*='menu']"),
    Locator::Css("button[aria-label*='Menu']"),
    Locator::Css(".menu-toggle"),
    Locator::Css(".navbar-toggler"),
    Locator::Css(".hamburger"),
    Locator::Css("nav button"),
];

pub const MODAL_TRIGGER_LOCATORS: &[Locator] = &[
    Locator::Css("[data-toggle='modal']"),
    Locator::Css("[data-bs-toggle='modal']"),
    Locator::Css("[aria-haspopup='dialog']"),
];

pub const ACCORDION_TRIGGER_LOCATORS: &[Locator] = &[
    Locator::Css(".accordion-button[aria-expanded='false']"),
    Locator::Css("button[aria-expanded='false'][aria-controls]"),
    Locator::Css("[aria-expanded='false']"),
];

pub const TAB_LOCATORS: &[Locator] = &[Locator::Css("[role='tab'][aria-selected='false']")];

/// A state change that can be attempted on a loaded page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    DismissCookies,
    OpenMenu,
    OpenInteractive,
}

struct Step {
    transition: Transition,
    min_profile: ScanProfile,
}

const STEPS: &[Step] = &[
    Step {
        transition: Transition::DismissCookies,
        min_profile: ScanProfile::Standard,
    },
    Step {
        transition: Transition::OpenMenu,
        min_profile: ScanProfile::Deep,
    },
    Step {
        transition: Transition::OpenInteractive,
        min_profile: ScanProfile::Deep,
    },
];

#[derive(Debug, Clone)]
pub struct ExplorerOptions {
    /// Upper bound for each visibility check and each click.
    pub action_timeout: Duration,
    /// Pause after the cookie banner step so late-rendering content settles.
    pub settle_delay: Duration,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            action_timeout: Duration::from_secs(3),
            settle_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Exploration {
    pub states: Vec<PageState>,
    pub total_states: usize,
}

pub struct StateExplorer {
    options: ExplorerOptions,
}

impl StateExplorer {
    pub fn new(options: ExplorerOptions) -> Self {
        Self { options }
    }

    /// Transitions to attempt after `default`, in order.
    pub fn plan(profile: ScanProfile) -> Vec<Transition> {
        STEPS
            .iter()
            .filter(|step| profile >= step.min_profile)
            .map(|step| step.transition)
            .collect()
    }

    /// Walk every transition for `profile` on the already-loaded page.
    pub async fn explore(&self, nav: &mut dyn Navigator, profile: ScanProfile) -> Exploration {
        let mut states = vec![PageState::default_state()];
        for transition in Self::plan(profile) {
            if let Some(state) = self.advance(nav, transition).await {
                states.push(state);
            }
        }
        let total_states = states.len();
        Exploration {
            states,
            total_states,
        }
    }

    /// Attempt one transition. `None` means the step produced no state at all.
    pub async fn advance(&self, nav: &mut dyn Navigator, transition: Transition) -> Option<PageState> {
        match transition {
            Transition::DismissCookies => Some(self.dismiss_cookies(nav).await),
            Transition::OpenMenu => Some(self.open_menu(nav).await),
            Transition::OpenInteractive => self.open_interactive(nav).await,
        }
    }

    async fn dismiss_cookies(&self, nav: &mut dyn Navigator) -> PageState {
        let state = match self.first_visible(nav, COOKIE_ACCEPT_LOCATORS).await {
            Some(locator) => {
                if self.click(nav, locator).await {
                    PageState::new(StateName::CookiesDismissed, "Cookie consent accepted", true)
                } else {
                    PageState::new(StateName::CookiesDismissed, "Cookie consent control could not be clicked", false)
                }
            }
            None => PageState::new(StateName::CookiesDismissed, "No cookie consent control found", false),
        };

        if !self.options.settle_delay.is_zero() {
            tokio::time::sleep(self.options.settle_delay).await;
        }
        state
    }

    async fn open_menu(&self, nav: &mut dyn Navigator) -> PageState {
        let Some(locator) = self.first_visible(nav, MENU_TOGGLE_LOCATORS).await else {
            return PageState::new(StateName::MenuOpen, "No navigation toggle found", false);
        };

        let expanded = timeout(self.options.action_timeout, nav.attribute(locator, "aria-expanded")).await;
        if let Ok(Ok(Some(value))) = expanded
            && value == "true"
        {
            return PageState::new(StateName::MenuOpen, "Navigation menu already expanded", true);
        }

        if self.click(nav, locator).await {
            PageState::new(StateName::MenuOpen, "Navigation menu expanded", true)
        } else {
            PageState::new(StateName::MenuOpen, "Navigation toggle could not be clicked", false)
        }
    }

    async fn open_interactive(&self, nav: &mut dyn Navigator) -> Option<PageState> {
        let candidates: [(&[Locator], StateName, &str); 3] = [
            (MODAL_TRIGGER_LOCATORS, StateName::ModalOpen, "Modal dialog opened"),
            (ACCORDION_TRIGGER_LOCATORS, StateName::AccordionOpen, "Accordion panel expanded"),
            (TAB_LOCATORS, StateName::TabSwitched, "Switched to an inactive tab"),
        ];

        for (locators, name, description) in candidates {
            if let Some(locator) = self.first_visible(nav, locators).await
                && self.click(nav, locator).await
            {
                return Some(PageState::new(name, description, true));
            }
        }

        debug!("No interactive component could be opened");
        None
    }

    async fn first_visible<'a>(&self, nav: &dyn Navigator, candidates: &'a [Locator]) -> Option<&'a Locator> {
        for locator in candidates {
            if let Ok(Ok(true)) = timeout(self.options.action_timeout, nav.is_visible(locator)).await {
                debug!("Visible: {}", locator);
                return Some(locator);
            }
        }
        None
    }

    async fn click(&self, nav: &mut dyn Navigator, locator: &Locator) -> bool {
        match timeout(self.options.action_timeout, nav.click(locator)).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                debug!("Click on {} failed: {}", locator, e);
                false
            }
            Err(_) => {
                debug!("Click on {} timed out", locator);
                false
            }
        }
    }
}

impl Default for StateExplorer {
    fn default() -> Self {
        Self::new(ExplorerOptions::default())
    }
}
