use std::sync::Arc;

use anyhow::{bail, Context};
use futures::channel::mpsc;
use rentix_client_core::{
    no_cb, ApiReceiver, Client, ClientConfiguration, CompanyOnboarding, FileTokenStore,
    GuardDecision, OnboardingError, OwnerChoice, Route, RouterAdapter, SessionError,
    SessionManager, SessionOutcome, SharedTokenStore,
};
use rentix_shared::{
    errors::ApiResult,
    id::{CompanyId, RecordId},
    req_args::{LoginReqArgs, NewUserReqArgs},
    resources::{AddressPatch, Company, FiscalPatch, LegalSection, Property, Tax, Tenant},
    storage::ThemePreference,
    uac::Email,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    cli::{Command, CreateCompanyArgs, ResourceKind},
    navigator::ConsoleNavigator,
};

/// Everything one invocation of the console needs
pub struct ConsoleApp {
    client: Client,
    store: SharedTokenStore,
    session: SessionManager<Client>,
    outcomes: mpsc::UnboundedReceiver<SessionOutcome>,
    router: RouterAdapter<ConsoleNavigator>,
}

impl ConsoleApp {
    pub fn new(configuration: &ClientConfiguration) -> anyhow::Result<Self> {
        let store: SharedTokenStore =
            Arc::new(FileTokenStore::open(configuration.storage.token_file.clone())?);
        let client = Client::from_settings(&configuration.client, Arc::clone(&store));
        let session = SessionManager::new(client.clone(), Arc::clone(&store));
        let outcomes = session.subscribe();
        Ok(Self {
            client,
            store,
            session,
            outcomes,
            router: RouterAdapter::new(ConsoleNavigator::default()),
        })
    }

    // The command is skipped as it may carry a password
    #[instrument(skip_all)]
    pub async fn run(&mut self, command: Command) -> anyhow::Result<()> {
        if command.needs_stored_session() {
            self.session.restore().await.map_err(into_anyhow)?;
        }
        let result = self.execute(command).await;
        self.follow_session();
        result
    }

    async fn execute(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Login { email, password } => {
                let email: Email = email.try_into().context("invalid email")?;
                let args = LoginReqArgs::new(email, password.into());
                self.session.login(args).await.map_err(into_anyhow)?;
            }
            Command::SelectCompany { company_id } => {
                let company_id: CompanyId =
                    company_id.try_into().context("invalid company id")?;
                self.session
                    .select_company(company_id)
                    .await
                    .map_err(into_anyhow)?;
            }
            Command::Status => self.print_status(),
            Command::Menu => {
                for entry in self.session.menu() {
                    println!("{:<16} {}", entry.label, entry.route);
                }
            }
            Command::Go { path } => {
                let target: Route = path.parse()?;
                let snapshot = self.session.snapshot();
                match self.router.request(&snapshot, target) {
                    GuardDecision::Allow => {}
                    GuardDecision::Defer => println!("Session still loading, try again"),
                    GuardDecision::Redirect(to) => {
                        println!("{target} is not available, sent to {to}")
                    }
                }
            }
            Command::List { resource } => self.list(resource).await?,
            Command::Trash { resource } => self.trash(resource).await?,
            Command::Restore { resource, id } => {
                let id: RecordId = id.try_into().context("invalid record id")?;
                self.restore(resource, &id).await?;
            }
            Command::CreateCompany(args) => self.create_company(args).await?,
            Command::Theme { theme: Some(theme) } => {
                self.store.set_theme_preference(theme);
                println!("Theme set to {theme}");
            }
            Command::Theme { theme: None } => {
                let theme: ThemePreference = self.store.theme_preference();
                println!("{theme}");
            }
            Command::Logout => {
                self.session.logout();
            }
        }
        Ok(())
    }

    async fn list(&self, resource: ResourceKind) -> anyhow::Result<()> {
        let client = &self.client;
        match resource {
            ResourceKind::Properties => print_all(client.find_all::<Property, _>(no_cb)).await,
            ResourceKind::Tenants => print_all(client.find_all::<Tenant, _>(no_cb)).await,
            ResourceKind::Taxes => print_all(client.find_all::<Tax, _>(no_cb)).await,
            ResourceKind::Companies => print_all(client.find_all::<Company, _>(no_cb)).await,
        }
    }

    async fn trash(&self, resource: ResourceKind) -> anyhow::Result<()> {
        let client = &self.client;
        match resource {
            ResourceKind::Properties => print_all(client.find_trash::<Property, _>(no_cb)).await,
            ResourceKind::Taxes => print_all(client.find_trash::<Tax, _>(no_cb)).await,
            other => bail!("{other:?} do not have a trash"),
        }
    }

    async fn restore(&self, resource: ResourceKind, id: &RecordId) -> anyhow::Result<()> {
        let client = &self.client;
        match resource {
            ResourceKind::Properties => print_one(client.restore::<Property, _>(id, no_cb)).await,
            ResourceKind::Taxes => print_one(client.restore::<Tax, _>(id, no_cb)).await,
            other => bail!("{other:?} cannot be restored"),
        }
    }

    async fn create_company(&mut self, args: CreateCompanyArgs) -> anyhow::Result<()> {
        let mut wizard = CompanyOnboarding::new(self.client.clone());
        let owner = match (args.owner_email, args.new_owner_email, args.new_owner_password) {
            (Some(email), _, _) => {
                let user = wizard
                    .search_owners(&email)
                    .await
                    .map_err(onboarding_error)?
                    .into_iter()
                    .find(|user| AsRef::<str>::as_ref(&user.email) == email)
                    .with_context(|| format!("no user with email {email}"))?;
                OwnerChoice::Existing(user)
            }
            (None, Some(email), Some(password)) => {
                let email: Email = email.try_into().context("invalid email")?;
                OwnerChoice::New(NewUserReqArgs::new(email, password.into()))
            }
            _ => bail!("an owner is required"),
        };
        wizard.submit_owner(owner).await.map_err(onboarding_error)?;

        wizard.update_section(LegalSection::Address(
            AddressPatch::default()
                .address_line1(args.address)
                .city(args.city)
                .postal_code(args.postal_code)
                .country_code(args.country),
        ));
        wizard.submit_address().await.map_err(onboarding_error)?;

        wizard.update_section(LegalSection::Fiscal(
            FiscalPatch::default()
                .corporate_name(args.corporate_name)
                .tax_id(args.tax_id),
        ));
        wizard.submit_fiscal().await.map_err(onboarding_error)?;

        let summary = wizard.summary().clone();
        let company = wizard
            .confirm(&self.session, args.accept_terms)
            .await
            .map_err(onboarding_error)?;
        println!("Registered {} ({})", company.legal_name, company.id);
        if let Some(owner) = summary.owner_email {
            println!("Owner:    {owner}");
        }
        if let Some(address) = summary.address {
            println!("Address:  {address}");
        }
        let snapshot = self.session.snapshot();
        self.router.request(&snapshot, Route::SelectCompany);
        Ok(())
    }

    /// Lets the router react to everything the session went through,
    /// including a logout forced by the backend
    fn follow_session(&mut self) {
        while let Ok(Some(outcome)) = self.outcomes.try_next() {
            info!(?outcome);
            let snapshot = self.session.snapshot();
            self.router.apply(&outcome, &snapshot);
        }
    }

    fn print_status(&self) {
        let snapshot = self.session.snapshot();
        println!("Phase:    {:?}", snapshot.phase());
        if let Some(user) = &snapshot.user {
            println!("User:     {} ({})", user.email, user.app_role);
        }
        println!("Role:     {:?}", snapshot.current_role());
        match &snapshot.selected_company_id {
            Some(company_id) => println!("Company:  {company_id}"),
            None => println!("Company:  -"),
        }
        for membership in &snapshot.company_memberships {
            let marker = if Some(&membership.company_id) == snapshot.selected_company_id.as_ref() {
                '*'
            } else {
                ' '
            };
            println!(
                "  {marker} {} {} {}",
                membership.company_id,
                membership.role,
                membership.company_name.as_deref().unwrap_or_default()
            );
        }
    }
}

fn into_anyhow(err: SessionError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

fn onboarding_error(err: OnboardingError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

async fn receive<T>(rx: ApiReceiver<T>) -> anyhow::Result<T> {
    let result: ApiResult<T> = rx.await.context("request dropped before it completed")?;
    result.map_err(|err| anyhow::anyhow!(err.user_message()))
}

async fn print_all<T: Serialize>(rx: ApiReceiver<Vec<T>>) -> anyhow::Result<()> {
    let records = receive(rx).await?;
    if records.is_empty() {
        println!("Nothing found");
    }
    for record in records {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}

async fn print_one<T: Serialize>(rx: ApiReceiver<T>) -> anyhow::Result<()> {
    let record = receive(rx).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
