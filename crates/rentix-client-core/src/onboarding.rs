//! Registers a new company in four steps: choose or create the owner, store
//! the fiscal address, store the fiscal identity and finally confirm. Each
//! step is sent as soon as it is submitted and the ids returned are kept for
//! the confirmation

use rentix_shared::{
    errors::ApiError,
    id::RecordId,
    log_err_as_warn,
    req_args::{NewUserReqArgs, UserSearchReqArgs},
    resources::{
        Company, CompanyDraft, CompanyLegalDraft, DraftError, FiscalIdentity, LegalSection, User,
    },
    uac::Email,
};
use secrecy::ExposeSecret as _;
use tracing::info;

use crate::{
    client::no_cb,
    session::{recv, SessionBackend, SessionManager},
    Client,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
pub enum OnboardingStep {
    Owner,
    Address,
    Fiscal,
    Confirm,
    Done,
}

#[derive(Debug, Clone)]
pub enum OwnerChoice {
    Existing(User),
    New(NewUserReqArgs),
}

#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Not available on the {actual} step, expected the {expected} step")]
    WrongStep {
        expected: OnboardingStep,
        actual: OnboardingStep,
    },
    #[error(transparent)]
    Invalid(#[from] DraftError),
    #[error("The terms must be accepted to register the company")]
    TermsNotAccepted,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl OnboardingError {
    pub fn user_message(&self) -> String {
        match self {
            OnboardingError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// What has been registered so far, for display on the confirmation step
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OnboardingSummary {
    pub owner_email: Option<Email>,
    pub address: Option<String>,
    pub corporate_name: Option<String>,
}

#[derive(Debug)]
pub struct CompanyOnboarding {
    client: Client,
    draft: CompanyLegalDraft,
    step: OnboardingStep,
    summary: OnboardingSummary,
    address_id: Option<RecordId>,
    fiscal_id: Option<RecordId>,
}

impl CompanyOnboarding {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            draft: CompanyLegalDraft::default(),
            step: OnboardingStep::Owner,
            summary: OnboardingSummary::default(),
            address_id: None,
            fiscal_id: None,
        }
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn draft(&self) -> &CompanyLegalDraft {
        &self.draft
    }

    pub fn summary(&self) -> &OnboardingSummary {
        &self.summary
    }

    /// Edits the draft. Sections already submitted are not sent again
    pub fn update_section(&mut self, section: LegalSection) {
        self.draft.update_section(section);
    }

    /// Candidates to own the company
    pub async fn search_owners(&self, search: &str) -> Result<Vec<User>, OnboardingError> {
        let args = UserSearchReqArgs::search(search);
        let listing = recv(self.client.search_users(&args, no_cb)).await?;
        Ok(listing.into_users())
    }

    #[tracing::instrument(skip(self))]
    pub async fn submit_owner(&mut self, choice: OwnerChoice) -> Result<(), OnboardingError> {
        self.expect_step(OnboardingStep::Owner)?;
        let owner = match choice {
            OwnerChoice::Existing(user) => user,
            OwnerChoice::New(args) => {
                if args.password.expose_secret().chars().count() < NewUserReqArgs::MIN_PASSWORD_LEN
                {
                    return Err(DraftError::TooShort {
                        field: "password",
                        min: NewUserReqArgs::MIN_PASSWORD_LEN,
                    }
                    .into());
                }
                let user = recv(self.client.new_user(&args, no_cb)).await?;
                info!(owner = %user.id, "created the owner of the new company");
                user
            }
        };
        self.draft.update_section(LegalSection::Owner(owner.id));
        self.summary.owner_email = Some(owner.email);
        self.step = OnboardingStep::Address;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn submit_address(&mut self) -> Result<(), OnboardingError> {
        self.expect_step(OnboardingStep::Address)?;
        self.draft.validate_address()?;
        let address = recv(self.client.create_address_draft(&self.draft.address, no_cb)).await?;
        self.summary.address = Some(format!("{}, {}", address.address_line1, address.city));
        self.address_id = Some(address.id);
        self.step = OnboardingStep::Fiscal;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn submit_fiscal(&mut self) -> Result<(), OnboardingError> {
        self.expect_step(OnboardingStep::Fiscal)?;
        self.draft.validate_fiscal()?;
        let fiscal = recv(
            self.client
                .create::<FiscalIdentity, _>(&self.draft.fiscal, no_cb),
        )
        .await?;
        self.summary.corporate_name = Some(fiscal.corporate_name);
        self.fiscal_id = Some(fiscal.id);
        self.step = OnboardingStep::Confirm;
        Ok(())
    }

    /// Registers the company then reloads the session so the new membership
    /// shows up for selection. The draft is cleared once registered
    #[tracing::instrument(skip(self, session))]
    pub async fn confirm<B: SessionBackend>(
        &mut self,
        session: &SessionManager<B>,
        accept_terms: bool,
    ) -> Result<Company, OnboardingError> {
        self.expect_step(OnboardingStep::Confirm)?;
        if !accept_terms {
            return Err(OnboardingError::TermsNotAccepted);
        }
        let (Some(user_id), Some(fiscal_address_id), Some(facturae_party_id)) = (
            self.draft.company.user_id.clone(),
            self.address_id.clone(),
            self.fiscal_id.clone(),
        ) else {
            // Only reachable if the steps were skipped
            return Err(OnboardingError::WrongStep {
                expected: OnboardingStep::Owner,
                actual: self.step,
            });
        };
        let draft = CompanyDraft {
            user_id,
            fiscal_address_id,
            facturae_party_id,
        };
        let company = recv(self.client.create::<Company, _>(&draft, no_cb)).await?;
        info!(company = %company.id, "company registered");
        // The company exists even if the reload fails, a later refresh picks it up
        log_err_as_warn!(
            session.refresh_session_data().await,
            "session not reloaded after registering a company"
        );
        self.draft.reset();
        self.address_id = None;
        self.fiscal_id = None;
        self.step = OnboardingStep::Done;
        Ok(company)
    }

    /// Returns to the previous step. Whatever it registered stays registered
    /// and is replaced if the step is submitted again
    pub fn go_back(&mut self) {
        self.step = match self.step {
            OnboardingStep::Address => OnboardingStep::Owner,
            OnboardingStep::Fiscal => OnboardingStep::Address,
            OnboardingStep::Confirm => OnboardingStep::Fiscal,
            other => other,
        };
    }

    fn expect_step(&self, expected: OnboardingStep) -> Result<(), OnboardingError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(OnboardingError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }
}
