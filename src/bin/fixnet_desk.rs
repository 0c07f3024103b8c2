//! FixNet desk - terminal front-end for the intake API
//!
//! Usage:
//!   fixnet-desk [--lang <code>] request
//!   fixnet-desk [--lang <code>] tickets [--search <text>] [--status <status>]
//!                                       [--set <ticket id> <status>]
//!   fixnet-desk [--lang <code>] chat
//!   fixnet-desk language <code>
//!
//! Reads the same environment as the server:
//! - FIXNET_API_URL (defaults to http://localhost:8001)
//! - FIXNET_STORAGE_PATH (defaults to fixnet_storage.json), which keeps the
//!   selected language and locally recorded tickets
//! - DEFAULT_LOCALE (defaults to en), used when neither a saved selection nor
//!   the OS locale names a supported language

use anyhow::{bail, Context, Result};
use fixnet::api::RepairApiClient;
use fixnet::catalog::{PickupSlot, Urgency, DEVICE_BRANDS, ISSUE_CATEGORIES};
use fixnet::chat::FixBot;
use fixnet::config::Config;
use fixnet::dashboard::TicketBoard;
use fixnet::i18n::{CatalogValidator, Language, LocaleTable, Translator};
use fixnet::models::{Ticket, TicketStatus};
use fixnet::storage::FileStore;
use fixnet::wizard::{
    DraftField, RequestWizard, SubmissionRejected, SubmitOutcome, SubmitReceipt, WizardError,
    WizardStep,
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{debug, info, warn};

const USAGE: &str = "Usage: fixnet-desk [--lang <code>] <request | tickets [--search <text>] [--status <status>] [--set <ticket id> <status>] | chat | language <code>>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Request,
    Tickets {
        search: String,
        status: Option<TicketStatus>,
        set: Option<(String, TicketStatus)>,
    },
    Chat,
    Language(String),
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    lang: Option<String>,
    command: Command,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut lang = None;
    let mut rest = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--lang" {
            lang = Some(iter.next().context("--lang requires a language code")?);
        } else {
            rest.push(arg);
        }
    }

    let mut rest = rest.into_iter();
    let command = match rest.next().as_deref() {
        Some("request") => Command::Request,
        Some("chat") => Command::Chat,
        Some("language") => Command::Language(rest.next().context("language requires a code")?),
        Some("tickets") => {
            let mut search = String::new();
            let mut status = None;
            let mut set = None;
            while let Some(flag) = rest.next() {
                match flag.as_str() {
                    "--search" => search = rest.next().context("--search requires a value")?,
                    "--status" => {
                        let value = rest.next().context("--status requires a value")?;
                        status = if value.eq_ignore_ascii_case("all") {
                            None
                        } else {
                            Some(value.parse::<TicketStatus>()?)
                        };
                    }
                    "--set" => {
                        let id = rest.next().context("--set requires a ticket ID")?;
                        let value = rest.next().context("--set requires a status")?;
                        set = Some((id, value.parse::<TicketStatus>()?));
                    }
                    other => bail!("Unknown option for tickets: {}", other),
                }
            }
            Command::Tickets {
                search,
                status,
                set,
            }
        }
        Some(other) => bail!("Unknown command: {}\n{}", other, USAGE),
        None => bail!(USAGE),
    };

    Ok(Args { lang, command })
}

/// Line-oriented prompts over any reader/writer pair.
struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Next trimmed line, or `None` once input is exhausted.
    fn read_answer(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.read_answer(prompt)?.context("Input closed")
    }

    /// Numbered menu. A blank answer skips the choice.
    fn choose(&mut self, prompt: &str, options: &[&str], hint: &str) -> Result<Option<usize>> {
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, option)?;
        }

        loop {
            let answer = self.ask(prompt)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => self.say(hint)?,
            }
        }
    }

    /// `true` when the answer is the localized "yes" or its first letter.
    fn confirm(&mut self, prompt: &str, yes: &str, no: &str) -> Result<bool> {
        let answer = self.ask(&format!("{} ({}/{})", prompt, yes, no))?.to_lowercase();
        let yes = yes.to_lowercase();
        Ok(!answer.is_empty() && (answer == yes || yes.starts_with(&answer)))
    }
}

fn field_list(t: &Translator<FileStore>, fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(|f| t.t(f.label_key()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn fill_device_info<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    t: &Translator<FileStore>,
    wizard: &mut RequestWizard,
) -> Result<()> {
    let hint = t.t("submitRequest.messages.chooseOption");

    let brands: Vec<&str> = DEVICE_BRANDS.iter().map(|b| b.name).collect();
    if let Some(i) = console.choose(t.t("submitRequest.form.deviceBrand"), &brands, hint)? {
        wizard.select_brand(brands[i])?;
    }
    let models = wizard.available_models();
    if !models.is_empty() {
        if let Some(i) = console.choose(t.t("submitRequest.form.deviceModel"), models, hint)? {
            wizard.select_model(models[i])?;
        }
    }

    let categories: Vec<&str> = ISSUE_CATEGORIES.iter().map(|c| c.category).collect();
    if let Some(i) = console.choose(t.t("submitRequest.form.issueCategory"), &categories, hint)? {
        wizard.select_category(categories[i])?;
    }
    let issues = wizard.available_issues();
    if !issues.is_empty() {
        if let Some(i) = console.choose(t.t("submitRequest.form.specificIssue"), issues, hint)? {
            wizard.select_issue(issues[i])?;
        }
    }

    let description = console.ask(t.t("submitRequest.form.describeIssue"))?;
    wizard.set_description(description)?;

    let urgencies: Vec<&str> = Urgency::ALL.iter().map(|u| t.t(u.label_key())).collect();
    if let Some(i) = console.choose(t.t("submitRequest.form.urgencyLevel"), &urgencies, hint)? {
        wizard.set_urgency(Urgency::ALL[i])?;
    }
    Ok(())
}

fn fill_contact_details<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    t: &Translator<FileStore>,
    wizard: &mut RequestWizard,
) -> Result<()> {
    let name = console.ask(t.t("submitRequest.form.fullName"))?;
    wizard.set_customer_name(name)?;
    let email = console.ask(t.t("submitRequest.form.emailAddress"))?;
    wizard.set_customer_email(email)?;
    let phone = console.ask(t.t("submitRequest.form.phoneNumber"))?;
    wizard.set_customer_phone(phone)?;
    Ok(())
}

fn fill_pickup_consent<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    t: &Translator<FileStore>,
    wizard: &mut RequestWizard,
) -> Result<()> {
    let address = console.ask(t.t("submitRequest.form.pickupAddress"))?;
    wizard.set_pickup_address(address)?;

    let slots: Vec<&str> = PickupSlot::ALL.iter().map(|s| t.t(s.label_key())).collect();
    let slot = console
        .choose(
            t.t("submitRequest.form.preferredPickupTime"),
            &slots,
            t.t("submitRequest.messages.chooseOption"),
        )?
        .map(|i| PickupSlot::ALL[i]);
    wizard.set_pickup_time(slot)?;

    console.say(t.t("submitRequest.form.gdprDescription"))?;
    let consent = console.confirm(
        t.t("submitRequest.form.gdprConsent"),
        t.t("common.yes"),
        t.t("common.no"),
    )?;
    wizard.set_gdpr_consent(consent)?;
    Ok(())
}

/// Offer to go forward or back once a step with a predecessor is filled.
/// A blank answer goes forward.
fn wants_previous_step<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    t: &Translator<FileStore>,
    step: WizardStep,
) -> Result<bool> {
    if step.previous().is_none() {
        return Ok(false);
    }

    let forward = match step.next() {
        Some(_) => t.t("submitRequest.buttons.nextStep"),
        None => t.t("submitRequest.buttons.submitRequest"),
    };
    let options = [forward, t.t("submitRequest.buttons.previous")];
    let picked = console.choose(
        t.t("common.confirm"),
        &options,
        t.t("submitRequest.messages.chooseOption"),
    )?;
    Ok(picked == Some(1))
}

/// Walk the wizard to a submitted ticket, recording it on the local board.
async fn run_request<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    t: &Translator<FileStore>,
    client: &RepairApiClient,
    board: &mut TicketBoard<FileStore>,
) -> Result<()> {
    console.say(&format!(
        "{} {}\n{}",
        t.t("submitRequest.title"),
        t.t("submitRequest.subtitle"),
        t.t("submitRequest.description")
    ))?;

    let mut wizard = RequestWizard::new();
    let mut refill = true;

    loop {
        let step = wizard.step();
        if refill {
            console.say(&format!(
                "\n[{}/{}] {} - {}",
                step.number(),
                WizardStep::ALL.len(),
                t.t(step.label_key()),
                t.t(step.title_key())
            ))?;
            match step {
                WizardStep::DeviceInfo => fill_device_info(console, t, &mut wizard)?,
                WizardStep::ContactDetails => fill_contact_details(console, t, &mut wizard)?,
                WizardStep::PickupConsent => fill_pickup_consent(console, t, &mut wizard)?,
            }
            if wants_previous_step(console, t, step)? {
                wizard.retreat()?;
                continue;
            }
        }
        refill = true;

        if step != WizardStep::PickupConsent {
            match wizard.advance() {
                Ok(_) => {}
                Err(WizardError::StepIncomplete { missing, .. }) => {
                    let fields = field_list(t, &missing);
                    console.say(&t.t_with(
                        "submitRequest.messages.stepIncomplete",
                        &[("fields", fields.as_str())],
                    ))?;
                }
                Err(e) => return Err(e.into()),
            }
            continue;
        }

        let payload = match wizard.begin_submit() {
            Ok(payload) => payload,
            Err(WizardError::ConsentRequired) => {
                console.say(&format!(
                    "{}: {}",
                    t.t("submitRequest.messages.consentRequired"),
                    t.t("submitRequest.messages.consentDescription")
                ))?;
                continue;
            }
            Err(WizardError::StepIncomplete { missing, .. }) => {
                let fields = field_list(t, &missing);
                console.say(&t.t_with(
                    "submitRequest.messages.stepIncomplete",
                    &[("fields", fields.as_str())],
                ))?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        console.say(t.t("submitRequest.buttons.submitting"))?;
        let mut recorded = None;
        let result = match client.create_request(&payload).await {
            Ok(response) => {
                recorded = response.data;
                response
                    .ticket_id
                    .map(|ticket_id| SubmitReceipt { ticket_id })
                    .ok_or_else(SubmissionRejected::without_reason)
            }
            Err(e) => {
                warn!("Repair request submission failed: {}", e);
                Err(SubmissionRejected::from(e))
            }
        };

        match wizard.finish_submit(result)? {
            SubmitOutcome::Submitted { ticket_id } => {
                console.say(t.t("submitRequest.messages.requestSubmitted"))?;
                console.say(&t.t_with(
                    "submitRequest.messages.ticketIssued",
                    &[("ticketId", ticket_id.as_str())],
                ))?;
                if let Some(request) = recorded {
                    board.record(Ticket::from(&request));
                }
                return Ok(());
            }
            SubmitOutcome::Failed(rejected) => {
                let reason = rejected
                    .reason()
                    .unwrap_or_else(|| t.t("submitRequest.messages.genericFailure"));
                console.say(&format!(
                    "{}: {}",
                    t.t("submitRequest.messages.submissionFailed"),
                    reason
                ))?;

                let retry = console.confirm(
                    t.t("submitRequest.buttons.submitRequest"),
                    t.t("common.yes"),
                    t.t("common.no"),
                )?;
                if !retry {
                    return Ok(());
                }
                refill = false;
            }
        }
    }
}

fn show_tickets<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    t: &Translator<FileStore>,
    board: &TicketBoard<FileStore>,
    search: &str,
    status: Option<TicketStatus>,
) -> Result<()> {
    let stats = board.stats();
    console.say(&format!(
        "{}: {}  {}: {}  {}: {}  {}: {}\n",
        t.t("admin.dashboard.stats.totalTickets"),
        stats.total,
        t.t("admin.dashboard.stats.pending"),
        stats.pending,
        t.t("admin.dashboard.stats.inProgress"),
        stats.in_progress,
        t.t("admin.dashboard.stats.completed"),
        stats.completed
    ))?;

    let tickets = board.filtered(search, status);
    if tickets.is_empty() {
        console.say(t.t("admin.dashboard.table.noTicketsFound"))?;
        console.say(t.t("admin.dashboard.table.noTicketsDescription"))?;
        return Ok(());
    }

    console.say(&format!(
        "{:<18} {:<20} {:<22} {:<20} {:<15} {}",
        t.t("admin.dashboard.table.headers.ticketId"),
        t.t("admin.dashboard.table.headers.customer"),
        t.t("admin.dashboard.table.headers.device"),
        t.t("admin.dashboard.table.headers.issue"),
        t.t("admin.dashboard.table.headers.status"),
        t.t("admin.dashboard.table.headers.priority")
    ))?;
    for ticket in tickets {
        console.say(&format!(
            "{:<18} {:<20} {:<22} {:<20} {:<15} {}",
            ticket.id,
            ticket.customer_name,
            ticket.device,
            ticket.issue,
            ticket.status.as_str(),
            ticket.priority
        ))?;
    }
    Ok(())
}

fn set_ticket_status<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    t: &Translator<FileStore>,
    board: &mut TicketBoard<FileStore>,
    id: &str,
    status: TicketStatus,
) -> Result<()> {
    if !board.update_status(id, status) {
        bail!("Unknown ticket: {}", id);
    }
    info!("Ticket {} set to {}", id, status.as_str());
    console.say(&format!(
        "{}: {} -> {}\n",
        t.t("admin.dashboard.table.update"),
        id,
        status.as_str()
    ))
}

fn run_chat<R: BufRead, W: Write>(console: &mut Console<R, W>, t: &Translator<FileStore>) -> Result<()> {
    let title = t.t("chatBot.title");
    let mut bot = FixBot::new(t);
    console.say(&format!("{} - {}", title, t.t("chatBot.subtitle")))?;
    if let Some(greeting) = bot.history().first() {
        console.say(&format!("{}: {}", title, greeting.message))?;
    }

    while let Some(line) = console.read_answer(t.t("chatBot.placeholder"))? {
        if line == "/quit" {
            break;
        }
        if let Some(answer) = bot.reply(t, &line) {
            console.say(&format!("{}: {}", title, answer.message))?;
        }
    }
    debug!("Chat ended after {} messages", bot.history().len());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fixnet=info".parse()?),
        )
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = Config::from_env()?;

    let table = Arc::new(LocaleTable::builtin().context("Failed to load locale catalogs")?);
    let report = CatalogValidator::validate(&table);
    for error in &report.errors {
        warn!("Catalog error: {}", error);
    }
    for warning in &report.warnings {
        debug!("Catalog warning: {}", warning);
    }

    let store = FileStore::new(&config.storage_path);
    let mut t = Translator::init(
        table,
        store.clone(),
        sys_locale::get_locales(),
        config.default_locale,
    );

    if let Some(code) = &args.lang {
        t.change_language(Language::from_code(code)?);
    }
    info!("Using language {}", t.current().name());

    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());

    match args.command {
        Command::Request => {
            let client = RepairApiClient::from_config(&config)?;
            let mut board = TicketBoard::load(store);
            run_request(&mut console, &t, &client, &mut board).await?;
        }
        Command::Tickets {
            search,
            status,
            set,
        } => {
            let mut board = TicketBoard::load(store);
            if let Some((id, new_status)) = set {
                set_ticket_status(&mut console, &t, &mut board, &id, new_status)?;
            }
            show_tickets(&mut console, &t, &board, &search, status)?;
        }
        Command::Chat => run_chat(&mut console, &t)?,
        Command::Language(code) => {
            let language = Language::from_code(&code)?;
            t.change_language(language);
            console.say(&t.t_with("common.languageChanged", &[("language", language.native_name())]))?;
        }
    }

    debug!("Translation lookups: {:?}", t.metrics().report());
    Ok(())
}
