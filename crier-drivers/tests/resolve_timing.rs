use async_trait::async_trait;
use crier_common::{CrierError, Result};
use crier_drivers::browser::{resolve, ElementHandle, PageSurface, Selector, SelectorCandidate};
use std::path::PathBuf;
use std::time::Duration;

/// Page where nothing ever becomes visible; every query burns its full wait.
struct BlankPage {
    queries: Vec<String>,
}

impl BlankPage {
    fn new() -> Self {
        Self {
            queries: Vec::new(),
        }
    }
}

#[async_trait]
impl PageSurface for BlankPage {
    async fn goto(&mut self, _url: &str) -> Result<()> {
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String> {
        Ok("about:blank".into())
    }

    async fn find_visible(
        &mut self,
        selector: &Selector,
        wait: Duration,
    ) -> Result<Option<ElementHandle>> {
        self.queries.push(selector.to_string());
        tokio::time::sleep(wait).await;
        Ok(None)
    }

    async fn click(&mut self, _handle: ElementHandle) -> Result<()> {
        unreachable!("nothing resolves on a blank page")
    }

    async fn send_char(&mut self, _handle: ElementHandle, _ch: char) -> Result<()> {
        unreachable!("nothing resolves on a blank page")
    }

    async fn attach_files(&mut self, _handle: ElementHandle, _paths: &[PathBuf]) -> Result<()> {
        unreachable!("nothing resolves on a blank page")
    }
}

#[tokio::test(start_paused = true)]
async fn exhausted_candidates_cost_the_sum_of_their_waits() {
    let mut page = BlankPage::new();
    let candidates = vec![
        SelectorCandidate::css("primary", "button[data-testid='publish']", 300),
        SelectorCandidate::xpath("fallback text", "//button[contains(., 'Post')]", 500),
        SelectorCandidate::css("generic", "button[type='submit']", 200),
    ];

    let start = tokio::time::Instant::now();
    let result = resolve(&mut page, "publish control", &candidates).await;
    let elapsed = start.elapsed();

    match result {
        Err(CrierError::ElementNotFound(target)) => assert_eq!(target, "publish control"),
        other => panic!("expected ElementNotFound, got {other:?}"),
    }

    // Strict ordering: every candidate tried exactly once, in declaration order.
    assert_eq!(
        page.queries,
        vec![
            "css=button[data-testid='publish']",
            "xpath=//button[contains(., 'Post')]",
            "css=button[type='submit']",
        ]
    );

    // Total latency is the sum of the configured waits, within 10%.
    let expected = Duration::from_millis(1000);
    let lower = expected.mul_f64(0.9);
    let upper = expected.mul_f64(1.1);
    assert!(
        elapsed >= lower && elapsed <= upper,
        "elapsed {elapsed:?} outside {lower:?}..{upper:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn first_visible_candidate_wins_and_later_ones_are_skipped() {
    /// Page where only the second selector resolves.
    struct SecondOnly {
        queries: Vec<String>,
    }

    #[async_trait]
    impl PageSurface for SecondOnly {
        async fn goto(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }

        async fn current_url(&mut self) -> Result<String> {
            Ok("about:blank".into())
        }

        async fn find_visible(
            &mut self,
            selector: &Selector,
            wait: Duration,
        ) -> Result<Option<ElementHandle>> {
            self.queries.push(selector.to_string());
            if self.queries.len() == 2 {
                return Ok(Some(ElementHandle(0)));
            }
            tokio::time::sleep(wait).await;
            Ok(None)
        }

        async fn click(&mut self, _handle: ElementHandle) -> Result<()> {
            Ok(())
        }

        async fn send_char(&mut self, _handle: ElementHandle, _ch: char) -> Result<()> {
            Ok(())
        }

        async fn attach_files(&mut self, _handle: ElementHandle, _paths: &[PathBuf]) -> Result<()> {
            Ok(())
        }
    }

    let mut page = SecondOnly {
        queries: Vec::new(),
    };
    let candidates = vec![
        SelectorCandidate::css("primary", "#a", 200),
        SelectorCandidate::css("secondary", "#b", 400),
        SelectorCandidate::css("tertiary", "#c", 800),
    ];

    let handle = resolve(&mut page, "composer", &candidates)
        .await
        .expect("second candidate matches");
    assert_eq!(handle, ElementHandle(0));
    assert_eq!(page.queries.len(), 2, "third candidate never queried");
}
