//! Session orchestration for one open wizard.
//!
//! Owns the asynchronous request lifecycle around the wizard: per-class
//! loading flags, eligibility state for ad-account platforms, and the
//! request-token discipline that discards stale or torn-down completions.
//! Requests are issued with `begin_*` (capturing a token) and resolved with
//! `complete_*`; the async drivers at the bottom tie both ends to a real
//! [`IntegrationApi`].

use log::{debug, info, warn};

use crate::api::{AccountsResponse, IntegrationApi, ResourcesResponse, SyncJobSpec};
use crate::api::{STATUS_NOT_ADS_USER, STATUS_SUCCESS};
use crate::platform::Platform;
use crate::selector::{ExternalResourceRef, ResourceOption};
use crate::wizard::Wizard;

/// Identifies the source dataset being synced.
#[derive(Debug, Clone, Default)]
pub struct SourceContext {
    pub premium_source_id: Option<String>,
    pub integration_id: Option<i64>,
}

/// One loading flag per outstanding request class, so a slow list fetch never
/// blocks account switching.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadingFlags {
    pub accounts: bool,
    pub lists: bool,
    pub submit: bool,
}

/// Whether the connected account may use the ads platform at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Eligibility {
    #[default]
    Unknown,
    Eligible,
    /// Terminal: the wizard is bypassed and a registration call-to-action
    /// shown instead.
    NotAdsUser,
}

/// Token issued when a list fetch starts. Captures the scoping account at
/// request time so a response arriving after the account changed is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFetchToken {
    account_id: Option<String>,
    generation: u64,
}

/// One open wizard plus its request orchestration state. Exactly one session
/// exists per (source, platform) pair; it is dropped on drawer close.
#[derive(Debug)]
pub struct SyncSession {
    wizard: Wizard,
    source: SourceContext,
    loading: LoadingFlags,
    eligibility: Eligibility,
    list_generation: u64,
    closed: bool,
    last_error: Option<String>,
}

impl SyncSession {
    pub fn create(platform: Platform, source: SourceContext) -> Self {
        Self::with_wizard(Wizard::new(platform), source)
    }

    pub fn edit(
        platform: Platform,
        source: SourceContext,
        sync_id: impl Into<String>,
        spec: &SyncJobSpec,
    ) -> Self {
        Self::with_wizard(Wizard::edit(platform, sync_id, spec), source)
    }

    fn with_wizard(wizard: Wizard, source: SourceContext) -> Self {
        Self {
            wizard,
            source,
            loading: LoadingFlags::default(),
            eligibility: Eligibility::default(),
            list_generation: 0,
            closed: false,
            last_error: None,
        }
    }

    pub fn platform(&self) -> Platform {
        self.wizard.profile().platform
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut Wizard {
        &mut self.wizard
    }

    pub fn source(&self) -> &SourceContext {
        &self.source
    }

    pub fn loading(&self) -> LoadingFlags {
        self.loading
    }

    pub fn eligibility(&self) -> Eligibility {
        self.eligibility
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn begin_fetch_accounts(&mut self) {
        self.loading.accounts = true;
    }

    pub fn complete_fetch_accounts(&mut self, result: anyhow::Result<AccountsResponse>) {
        if self.closed {
            debug!("discarding account fetch: session closed");
            return;
        }
        self.loading.accounts = false;
        match result {
            Ok(response) if response.status == STATUS_SUCCESS => {
                self.eligibility = Eligibility::Eligible;
                let options: Vec<ResourceOption> =
                    response.customers.into_iter().map(Into::into).collect();
                debug!("loaded {} accounts", options.len());
                self.wizard.account.set_options(options);
            }
            Ok(response) if response.status == STATUS_NOT_ADS_USER => {
                info!("account is not an ads user; wizard bypassed");
                self.eligibility = Eligibility::NotAdsUser;
            }
            Ok(response) => {
                self.last_error = Some(format!("account listing failed: {}", response.status));
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Record an account choice and start fetching its lists. Previously
    /// fetched lists belong to the old account and are dropped immediately.
    pub fn select_account(&mut self, option: ResourceOption) -> ListFetchToken {
        self.wizard
            .account
            .select(ExternalResourceRef::existing(&option.id, &option.name));
        self.wizard.list.reset_options();
        self.wizard
            .invalidate_step(crate::platform::StepKind::SelectOrCreateList);
        self.begin_fetch_lists()
    }

    /// Start a list fetch, capturing the current scoping account.
    pub fn begin_fetch_lists(&mut self) -> ListFetchToken {
        self.list_generation += 1;
        self.loading.lists = true;
        ListFetchToken {
            account_id: self.current_account_id(),
            generation: self.list_generation,
        }
    }

    /// Resolve a list fetch. Completions are discarded when the session has
    /// closed, when a newer fetch superseded this one, or when the scoping
    /// account changed between issue and resolution.
    pub fn complete_fetch_lists(
        &mut self,
        token: ListFetchToken,
        result: anyhow::Result<ResourcesResponse>,
    ) {
        if self.closed {
            debug!("discarding list fetch: session closed");
            return;
        }
        if token.generation != self.list_generation {
            debug!(
                "discarding stale list fetch (generation {} < {})",
                token.generation, self.list_generation
            );
            return;
        }
        if token.account_id != self.current_account_id() {
            warn!(
                "discarding list fetch for account {:?}: current account is {:?}",
                token.account_id,
                self.current_account_id()
            );
            return;
        }
        self.loading.lists = false;
        match result {
            Ok(response) if response.status == STATUS_SUCCESS => {
                let options: Vec<ResourceOption> =
                    response.user_lists.into_iter().map(Into::into).collect();
                debug!("loaded {} lists", options.len());
                self.wizard.list.set_options(options);
            }
            Ok(response) => {
                self.last_error = Some(format!("list fetch failed: {}", response.status));
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Tear down the session. In-flight requests may still complete on the
    /// network but their effects are ignored from here on.
    pub fn close(&mut self) {
        self.closed = true;
        self.wizard.reset();
    }

    pub(crate) fn set_submit_loading(&mut self, loading: bool) {
        self.loading.submit = loading;
    }

    fn current_account_id(&self) -> Option<String> {
        self.wizard
            .account
            .selection()
            .map(|r| r.wire_id().to_string())
    }
}

/// Fetch accounts and apply the result in one await.
pub async fn refresh_accounts(api: &dyn IntegrationApi, session: &mut SyncSession) {
    session.begin_fetch_accounts();
    let result = api.list_accounts(session.platform()).await;
    session.complete_fetch_accounts(result);
}

/// Fetch lists for the currently selected account and apply the result.
pub async fn refresh_lists(api: &dyn IntegrationApi, session: &mut SyncSession) {
    let token = session.begin_fetch_lists();
    let account_id = session
        .wizard()
        .account
        .selection()
        .map(|r| r.wire_id().to_string());
    let result = api
        .list_resources(session.platform(), account_id.as_deref())
        .await;
    session.complete_fetch_lists(token, result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Customer, UserList};
    use crate::platform::StepKind;

    fn accounts_ok(customers: &[(&str, &str)]) -> anyhow::Result<AccountsResponse> {
        Ok(AccountsResponse {
            status: STATUS_SUCCESS.into(),
            customers: customers
                .iter()
                .map(|(id, name)| Customer {
                    customer_id: id.to_string(),
                    customer_name: name.to_string(),
                })
                .collect(),
        })
    }

    fn lists_ok(lists: &[(&str, &str)]) -> anyhow::Result<ResourcesResponse> {
        Ok(ResourcesResponse {
            status: STATUS_SUCCESS.into(),
            user_lists: lists
                .iter()
                .map(|(id, name)| UserList {
                    id: id.to_string(),
                    list_name: name.to_string(),
                })
                .collect(),
        })
    }

    fn ads_session() -> SyncSession {
        let mut session = SyncSession::create(Platform::GoogleAds, SourceContext::default());
        session.begin_fetch_accounts();
        session.complete_fetch_accounts(accounts_ok(&[("A", "Account A"), ("B", "Account B")]));
        session
    }

    #[test]
    fn account_fetch_populates_options_and_eligibility() {
        let session = ads_session();
        assert_eq!(session.eligibility(), Eligibility::Eligible);
        assert_eq!(session.wizard().account.options().len(), 2);
        assert!(!session.loading().accounts);
    }

    #[test]
    fn not_ads_user_is_a_terminal_state_not_an_error() {
        let mut session = SyncSession::create(Platform::GoogleAds, SourceContext::default());
        session.begin_fetch_accounts();
        session.complete_fetch_accounts(Ok(AccountsResponse {
            status: STATUS_NOT_ADS_USER.into(),
            customers: vec![],
        }));
        assert_eq!(session.eligibility(), Eligibility::NotAdsUser);
        assert!(session.last_error().is_none());
    }

    #[test]
    fn stale_list_response_for_previous_account_is_discarded() {
        let mut session = ads_session();

        let token_a = session.select_account(ResourceOption {
            id: "A".into(),
            name: "Account A".into(),
        });
        let token_b = session.select_account(ResourceOption {
            id: "B".into(),
            name: "Account B".into(),
        });

        // B's fetch resolves first; A's resolves late and must be dropped.
        session.complete_fetch_lists(token_b, lists_ok(&[("7", "Spring")]));
        session.complete_fetch_lists(token_a, lists_ok(&[("1", "Old List")]));

        let names: Vec<&str> = session
            .wizard()
            .list
            .options()
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(names, vec!["Spring"]);
    }

    #[test]
    fn superseded_fetch_for_same_account_is_discarded() {
        let mut session = ads_session();
        session.select_account(ResourceOption { id: "A".into(), name: "Account A".into() });

        let first = session.begin_fetch_lists();
        let second = session.begin_fetch_lists();
        session.complete_fetch_lists(second, lists_ok(&[("2", "New")]));
        session.complete_fetch_lists(first, lists_ok(&[("1", "Old")]));

        assert_eq!(session.wizard().list.options().len(), 1);
        assert_eq!(session.wizard().list.options()[0].name, "New");
    }

    #[test]
    fn switching_accounts_drops_the_previous_selection() {
        let mut session = ads_session();
        let token = session.select_account(ResourceOption {
            id: "A".into(),
            name: "Account A".into(),
        });
        session.complete_fetch_lists(token, lists_ok(&[("7", "Spring")]));
        session
            .wizard_mut()
            .list
            .select(ExternalResourceRef::existing("7", "Spring"));
        assert!(session.wizard().is_step_valid(StepKind::SelectOrCreateList));

        session.select_account(ResourceOption { id: "B".into(), name: "Account B".into() });
        assert!(!session.wizard().is_step_valid(StepKind::SelectOrCreateList));
        assert!(session.wizard().list.options().is_empty());
    }

    #[test]
    fn closed_session_ignores_late_completions() {
        let mut session = ads_session();
        let token = session.select_account(ResourceOption {
            id: "A".into(),
            name: "Account A".into(),
        });
        session.close();

        session.complete_fetch_lists(token, lists_ok(&[("7", "Spring")]));
        session.complete_fetch_accounts(accounts_ok(&[("C", "Account C")]));

        assert!(session.wizard().list.options().is_empty());
        assert!(session.wizard().account.options().is_empty());
    }

    #[test]
    fn fetch_failure_surfaces_as_error_data() {
        let mut session = ads_session();
        let token = session.begin_fetch_lists();
        session.complete_fetch_lists(token, Err(anyhow::anyhow!("connection refused")));
        assert_eq!(session.last_error(), Some("connection refused"));
        session.clear_error();
        assert!(session.last_error().is_none());
    }

    #[tokio::test]
    async fn refresh_drivers_apply_results() {
        use crate::api::{CreateResourceRequest, CreateResourceResponse};
        use async_trait::async_trait;

        struct StubApi;

        #[async_trait]
        impl IntegrationApi for StubApi {
            async fn list_accounts(&self, _: Platform) -> anyhow::Result<AccountsResponse> {
                Ok(AccountsResponse {
                    status: STATUS_SUCCESS.into(),
                    customers: vec![Customer {
                        customer_id: "123".into(),
                        customer_name: "Acme".into(),
                    }],
                })
            }
            async fn list_resources(
                &self,
                _: Platform,
                _: Option<&str>,
            ) -> anyhow::Result<ResourcesResponse> {
                Ok(ResourcesResponse {
                    status: STATUS_SUCCESS.into(),
                    user_lists: vec![UserList { id: "7".into(), list_name: "Spring".into() }],
                })
            }
            async fn create_resource(
                &self,
                _: Platform,
                _: &CreateResourceRequest,
            ) -> anyhow::Result<CreateResourceResponse> {
                unreachable!("not exercised")
            }
            async fn create_sync(&self, _: &SyncJobSpec) -> anyhow::Result<()> {
                Ok(())
            }
            async fn update_sync(&self, _: &str, _: &SyncJobSpec) -> anyhow::Result<()> {
                Ok(())
            }
        }

        let mut session = SyncSession::create(Platform::GoogleAds, SourceContext::default());
        refresh_accounts(&StubApi, &mut session).await;
        assert_eq!(session.wizard().account.options().len(), 1);

        session.select_account(ResourceOption { id: "123".into(), name: "Acme".into() });
        refresh_lists(&StubApi, &mut session).await;
        assert_eq!(session.wizard().list.options().len(), 1);
    }
}
