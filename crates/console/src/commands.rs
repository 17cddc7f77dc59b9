//! Command handlers. Each one fetches what its view needs, prints it to
//! stdout and reports outcomes through the terminal notifier.

use std::future::Future;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::warn;
use salesops::actions::{self, available_actions, ActionOutcome, OrderAction};
use salesops::emails::thread::{reply_subject, sort_chronological, ReplyDraft};
use salesops::emails::{ConversationFilter, ConversationSummary, ProcessEmailRequest};
use salesops::notify::Notifier;
use salesops::orders::OrdersClient;
use salesops::rules::draft::blob_value;
use salesops::rules::{RuleDraft, RuleTestRequest, RuleType};
use salesops::SalesOps;
use serde_json::Value;

use crate::demo;
use crate::prompt::{PromptConfirm, TerminalNotifier};
use crate::render;
use crate::RuleArgs;

pub struct Console {
    api: SalesOps,
    notifier: TerminalNotifier,
    confirm: PromptConfirm,
}

/// Notifies `ok` or `failed` depending on `result` and passes it on
fn report<T>(
    notifier: &dyn Notifier,
    result: salesops::Result<T>,
    ok: &str,
    failed: &str,
) -> Result<T> {
    match result {
        Ok(value) => {
            notifier.success(ok);
            Ok(value)
        }
        Err(e) => {
            notifier.error(failed);
            Err(e.into())
        }
    }
}

/// `-` reads the content from stdin
fn read_content(content: &str) -> Result<String> {
    if content != "-" {
        return Ok(content.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read email content from stdin")?;
    Ok(buf)
}

pub fn write_pdf(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

/// Runs `refresh` on every tick until `shutdown` resolves, returning the
/// number of refreshes. `shutdown` is created once and checked first, so a
/// signal that arrives during a refresh ends the loop at the next turn.
pub async fn watch_until<S, F, Fut>(period: Duration, shutdown: S, mut refresh: F) -> usize
where
    S: Future<Output = ()>,
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(period);
    let mut runs = 0;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                refresh().await;
                runs += 1;
            }
        }
    }
    runs
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

impl RuleArgs {
    fn apply(self, draft: &mut RuleDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(conditions) = self.conditions {
            draft.conditions = conditions;
        }
        if let Some(actions) = self.actions {
            draft.actions = actions;
        }
        if let Some(priority) = self.priority {
            draft.set_priority_input(&priority);
        }
        if let Some(rule_type) = self.rule_type {
            let rule_type = RuleType::from(rule_type);
            if !RuleType::KNOWN.contains(&rule_type) {
                let known = RuleType::KNOWN
                    .iter()
                    .map(RuleType::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                warn!(
                    "Rule type '{}' is not one of {}, sending it as is",
                    rule_type.as_str(),
                    known
                );
            }
            draft.rule_type = rule_type;
        }
        if let Some(active) = self.active {
            draft.is_active = active;
        }
    }
}

impl Console {
    pub fn new(api: SalesOps, confirm: PromptConfirm) -> Self {
        Self {
            api,
            notifier: TerminalNotifier,
            confirm,
        }
    }

    fn orders_client(&self) -> OrdersClient {
        self.api.orders()
    }

    pub async fn health(&self) -> Result<()> {
        let health = self
            .api
            .health()
            .await
            .with_context(|| format!("backend at {} is not reachable", self.api.url))?;
        println!("{}", render::health(&self.api.url, &health));
        Ok(())
    }

    async fn print_dashboard(&self) -> Result<()> {
        let (stats, health) = tokio::join!(self.api.stats(), self.api.health());
        let stats = stats.context("failed to load statistics")?;
        match health {
            Ok(health) => println!("{}", render::health(&self.api.url, &health)),
            Err(e) => warn!("health check failed: {}", e),
        }
        println!("Updated {}\n", chrono::Local::now().format("%H:%M:%S"));
        print!("{}", render::dashboard(&stats));
        Ok(())
    }

    /// With `watch`, refreshes on the configured interval until Ctrl-C. A
    /// failed refresh is reported and the next tick tries again.
    pub async fn dashboard(&self, watch: bool) -> Result<()> {
        if !watch {
            return self.print_dashboard().await;
        }
        let console = self;
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        };
        watch_until(self.api.options.refresh_interval, shutdown, move || async move {
            if let Err(e) = console.print_dashboard().await {
                console.notifier.error(&format!("{:#}", e));
            }
            println!();
        })
        .await;
        Ok(())
    }

    pub async fn fetch_emails(&self) -> Result<()> {
        let result = self.api.emails().fetch_emails().await;
        report(
            &self.notifier,
            result,
            "Email fetching started",
            "Failed to start email fetching",
        )?;
        Ok(())
    }

    pub async fn process_workflow(&self) -> Result<()> {
        let result = self.orders_client().process_workflow().await;
        report(
            &self.notifier,
            result,
            "Workflow processing started",
            "Failed to start workflow processing",
        )?;
        Ok(())
    }

    pub async fn orders(&self) -> Result<()> {
        let orders = self.orders_client().inquiries().await?;
        print!("{}", render::order_list(&orders, "No new inquiries"));
        Ok(())
    }

    pub async fn order(&self, id: i64) -> Result<()> {
        let order = self.orders_client().get(id).await?;
        print!("{}", render::order_detail(&order));
        Ok(())
    }

    pub async fn completed(&self) -> Result<()> {
        let orders = self.orders_client().completed().await?;
        print!("{}", render::order_list(&orders, "No completed orders"));
        Ok(())
    }

    pub async fn pdf(&self, id: i64, out: Option<PathBuf>) -> Result<()> {
        let result = self.orders_client().download_pdf(id).await;
        let bytes = report(
            &self.notifier,
            result,
            "Sales order PDF generated",
            "PDF generation failed",
        )?;
        let path = out.unwrap_or_else(|| PathBuf::from(OrdersClient::pdf_file_name(id)));
        write_pdf(&path, &bytes)?;
        println!("{}", path.display());
        Ok(())
    }

    pub async fn emails(&self, limit: Option<u32>, offset: u32) -> Result<()> {
        let limit = limit.unwrap_or(self.api.options.page_size);
        let emails = self.api.emails().list(limit, offset).await?;
        for email in &emails {
            println!("{}", render::email_log_row(email));
        }
        if emails.is_empty() {
            println!("No emails");
        }
        Ok(())
    }

    pub async fn conversations(&self, stage: &str, direction: &str, expand: bool) -> Result<()> {
        let conversations = self.api.emails().conversations().await?;
        let filter = ConversationFilter::from_selects(stage, direction);
        let shown = filter.apply(&conversations);
        let summary = ConversationSummary::from_conversations(&conversations);

        println!("{}\n", render::conversation_summary(&summary));
        if shown.is_empty() {
            println!("No conversations match the filters");
        }
        for conversation in shown {
            println!("{}", render::conversation_row(conversation));
            if expand {
                let mut emails = self.orders_client().emails(conversation.order_id).await?;
                sort_chronological(&mut emails);
                println!("{}", render::thread(&emails));
            }
        }
        Ok(())
    }

    pub async fn thread(&self, id: i64) -> Result<()> {
        let orders = self.orders_client();
        let order = orders.get(id).await?;
        let mut emails = orders.emails(id).await?;
        sort_chronological(&mut emails);

        println!(
            "Order #{} with {} <{}>\n",
            order.id,
            order.display_name(),
            order.customer_email
        );
        println!("{}", render::thread(&emails));
        if let Some(subject) = reply_subject(&emails) {
            println!("Reply subject: {}", subject);
        }
        Ok(())
    }

    pub async fn actions(&self, id: i64) -> Result<()> {
        let order = self.orders_client().get(id).await?;
        print!("{}", render::actions(&order, &available_actions(&order)));
        Ok(())
    }

    pub async fn act(&self, id: i64, action: &str) -> Result<()> {
        let action: OrderAction = action.parse()?;
        let orders = self.orders_client();
        let order = orders.get(id).await?;

        match actions::perform(&self.api, &order, action, &self.notifier).await? {
            ActionOutcome::Pdf(bytes) => {
                let path = PathBuf::from(OrdersClient::pdf_file_name(id));
                write_pdf(&path, &bytes)?;
                println!("{}", path.display());
            }
            ActionOutcome::Draft(generated) => {
                let emails = orders.emails(id).await?;
                let mut draft = ReplyDraft::for_thread(&order, &emails);
                draft.apply_generated(&generated);
                print_draft(&draft);
            }
            ActionOutcome::Updated(_) | ActionOutcome::WorkflowTriggered(_) => {
                let order = orders.get(id).await?;
                println!("Order #{} is now {}", order.id, render::badge(order.status.as_str()));
            }
        }
        Ok(())
    }

    pub async fn reply(&self, id: i64, body: &str, subject: Option<String>) -> Result<()> {
        let orders = self.orders_client();
        let order = orders.get(id).await?;
        let emails = orders.emails(id).await?;

        let mut draft = ReplyDraft::for_thread(&order, &emails).with_body(body);
        if let Some(subject) = subject {
            draft = draft.with_subject(subject);
        }
        actions::send_reply(&self.api, &draft, &self.notifier).await?;
        Ok(())
    }

    pub async fn draft(&self, id: i64, send: bool) -> Result<()> {
        let orders = self.orders_client();
        let order = orders.get(id).await?;
        let emails = orders.emails(id).await?;

        let generated = match actions::perform(
            &self.api,
            &order,
            OrderAction::GenerateResponse,
            &self.notifier,
        )
        .await?
        {
            ActionOutcome::Draft(generated) => generated,
            other => bail!("unexpected outcome {:?}", other),
        };

        let mut draft = ReplyDraft::for_thread(&order, &emails);
        draft.apply_generated(&generated);
        print_draft(&draft);

        if send {
            actions::send_reply(&self.api, &draft, &self.notifier).await?;
        }
        Ok(())
    }

    pub async fn submit(
        &self,
        content: &str,
        order: Option<i64>,
        customer_email: Option<String>,
    ) -> Result<()> {
        let content = read_content(content)?;
        let (request, ok, failed) = match order {
            Some(id) => (
                ProcessEmailRequest::for_order(id, &content)?,
                "Message sent to order successfully!",
                "Failed to send message",
            ),
            None => {
                let mut request = ProcessEmailRequest::new(content);
                if let Some(email) = customer_email {
                    request = request.customer_email(email);
                }
                (request, "Email processed", "Failed to process email")
            }
        };
        let result = self.api.emails().process_email(&request).await;
        let response = report(&self.notifier, result, ok, failed)?;
        if let Some(id) = response.id {
            println!("Order #{}", id);
        }
        Ok(())
    }

    pub async fn new_order(&self, email: &str, content: &str) -> Result<()> {
        let content = read_content(content)?;
        let request = match ProcessEmailRequest::new_order(email, &content) {
            Ok(request) => request,
            Err(e) => {
                self.notifier.error("Please enter customer email and order content");
                return Err(e.into());
            }
        };
        let result = self.api.emails().process_email(&request).await;
        let response = report(
            &self.notifier,
            result,
            "New order created successfully!",
            "Failed to send message",
        )?;
        if let Some(id) = response.id {
            println!("Order #{}", id);
        }
        Ok(())
    }

    pub async fn demo(&self, template: Option<&str>) -> Result<()> {
        let Some(id) = template else {
            for sample in &demo::SAMPLES {
                println!("{:<14} {:<14} {}", sample.id, sample.title, sample.preview());
            }
            return Ok(());
        };
        let sample = demo::find(id).with_context(|| {
            let ids: Vec<&str> = demo::SAMPLES.iter().map(|s| s.id).collect();
            format!("unknown sample '{}', expected one of: {}", id, ids.join(", "))
        })?;

        let request = ProcessEmailRequest::new(sample.content);
        let result = self.api.emails().process_email(&request).await;
        let response = report(
            &self.notifier,
            result,
            "Email processed",
            "Failed to process email. Make sure the backend is running and try again.",
        )?;
        if let Some(order_id) = response.id {
            println!("Order #{} created. Follow it with `salesops thread {}`.", order_id, order_id);
        }
        Ok(())
    }

    pub async fn rules_list(&self) -> Result<()> {
        let rules = self.api.rules().list().await?;
        if rules.is_empty() {
            println!("No rules");
        }
        for rule in &rules {
            println!("{}", render::rule_row(rule));
        }
        Ok(())
    }

    pub async fn rules_show(&self, id: i64) -> Result<()> {
        let rule = self.api.rules().get(id).await?;
        print!("{}", render::rule_detail(&rule));
        Ok(())
    }

    pub async fn rules_create(&self, args: RuleArgs) -> Result<()> {
        let mut draft = RuleDraft::new();
        args.apply(&mut draft);
        if draft.name.trim().is_empty() {
            bail!("a rule needs a --name");
        }
        let result = self.api.rules().create(&draft.to_new_rule()).await;
        let created = report(
            &self.notifier,
            result,
            "Rule created successfully",
            "Failed to create rule",
        )?;
        if let Some(id) = created.get("id") {
            println!("Rule {}", id);
        }
        Ok(())
    }

    pub async fn rules_update(&self, id: i64, args: RuleArgs) -> Result<()> {
        let rules = self.api.rules();
        let rule = rules.get(id).await?;
        let mut draft = RuleDraft::from_rule(&rule);
        args.apply(&mut draft);
        let result = rules.update(id, &draft.to_update()).await;
        report(
            &self.notifier,
            result,
            "Rule updated successfully",
            "Failed to update rule",
        )?;
        Ok(())
    }

    pub async fn rules_toggle(&self, id: i64) -> Result<()> {
        let rules = self.api.rules();
        let rule = rules.get(id).await?;
        let result = rules.toggle(&rule).await;
        report(
            &self.notifier,
            result,
            "Rule status updated",
            "Failed to update rule status",
        )?;
        println!(
            "Rule {} is now {}",
            id,
            if rule.is_active { "inactive" } else { "active" }
        );
        Ok(())
    }

    pub async fn rules_delete(&self, id: i64) -> Result<()> {
        let result = self.api.rules().delete_confirmed(id, &self.confirm).await;
        match result {
            Ok(true) => self.notifier.success("Rule deleted successfully"),
            Ok(false) => {}
            Err(e) => {
                self.notifier.error("Failed to delete rule");
                return Err(e.into());
            }
        }
        Ok(())
    }

    pub async fn rules_test(&self, conditions: &str, metrics: &str) -> Result<()> {
        let test_metrics = serde_json::from_str::<Value>(metrics)
            .context("--metrics must be valid JSON")?;
        let request = RuleTestRequest {
            conditions: blob_value(conditions),
            test_metrics,
        };
        let result = self.api.rules().test(&request).await?;
        print_json(&result);
        Ok(())
    }

    pub async fn rules_stats(&self) -> Result<()> {
        print_json(&self.api.rules().stats().await?);
        Ok(())
    }

    pub async fn task(&self, id: i64, task_type: &str, parameters: Option<&str>) -> Result<()> {
        let parameters = parameters
            .map(serde_json::from_str::<Value>)
            .transpose()
            .context("--parameters must be valid JSON")?;
        let created = self
            .orders_client()
            .add_task(id, task_type, parameters)
            .await?;
        print_json(&created);
        Ok(())
    }
}

fn print_draft(draft: &ReplyDraft) {
    println!("To:      {}", draft.to);
    println!("Subject: {}", draft.subject);
    if let Some(message_id) = draft.reply_to_message_id.as_deref() {
        println!("In-Reply-To: {}", message_id);
    }
    println!("\n{}", draft.body);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn writes_pdf_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OrdersClient::pdf_file_name(9));
        write_pdf(&path, b"%PDF-1.4").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
        assert!(path.ends_with("Sales_Order_9.pdf"));
    }

    #[test]
    fn pdf_write_error_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.pdf");
        let err = write_pdf(&path, b"x").unwrap_err();
        assert!(err.to_string().contains("out.pdf"));
    }

    #[test]
    fn rule_args_fill_the_draft() {
        let mut draft = RuleDraft::new();
        RuleArgs {
            name: Some("Bulk".into()),
            priority: Some("0".into()),
            rule_type: Some("amount".into()),
            active: Some(false),
            ..Default::default()
        }
        .apply(&mut draft);
        assert_eq!(draft.name, "Bulk");
        assert_eq!(draft.priority, 1);
        assert_eq!(draft.rule_type, RuleType::Amount);
        assert!(!draft.is_active);
        assert_eq!(draft.description, "");
    }

    #[test]
    fn unknown_rule_type_is_kept_verbatim() {
        let mut draft = RuleDraft::new();
        RuleArgs {
            rule_type: Some("region".into()),
            ..Default::default()
        }
        .apply(&mut draft);
        assert_eq!(draft.rule_type.as_str(), "region");
        assert!(!RuleType::KNOWN.contains(&draft.rule_type));
    }

    #[tokio::test]
    async fn shutdown_during_refresh_stops_the_watch() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let tx = RefCell::new(Some(tx));
        let shutdown = async {
            let _ = rx.await;
        };
        let runs = watch_until(Duration::from_millis(5), shutdown, || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(());
            }
            async {}
        })
        .await;
        assert_eq!(runs, 1);
    }

    #[tokio::test]
    async fn watch_keeps_refreshing_until_shutdown() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let tx = RefCell::new(Some(tx));
        let count = Cell::new(0);
        let shutdown = async {
            let _ = rx.await;
        };
        let runs = watch_until(Duration::from_millis(1), shutdown, || {
            count.set(count.get() + 1);
            if count.get() == 3 {
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(());
                }
            }
            async {}
        })
        .await;
        assert_eq!(runs, 3);
    }

    #[test]
    fn literal_content_passes_through() {
        assert_eq!(read_content("Need 5 chairs").unwrap(), "Need 5 chairs");
    }
}
