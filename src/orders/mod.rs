//! Order endpoints of the backend

mod types;
pub mod views;

pub use types::*;

use reqwest::Client;
use serde_json::Value;

use crate::emails::EmailLog;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::workflow::OrderStatus;

/// Client for `/api/orders` and the workflow trigger
pub struct OrdersClient {
    /// The backend base URL
    url: String,

    /// HTTP client
    client: Client,

    /// `limit` used by the locally filtered views
    list_limit: u32,
}

impl OrdersClient {
    pub(crate) fn new(url: &str, client: Client, list_limit: u32) -> Self {
        Self {
            url: url.to_string(),
            client,
            list_limit,
        }
    }

    fn order_url(&self, id: i64) -> String {
        format!("{}/api/orders/{}", self.url, id)
    }

    /// List orders, optionally filtered by status on the server
    pub async fn list(&self, query: &ListOrders) -> Result<Vec<Order>, Error> {
        let url = format!("{}/api/orders", self.url);
        Fetch::get(&self.client, &url)
            .query_opt("status", query.status.as_ref())
            .query_param("limit", query.limit)
            .query_param("offset", query.offset)
            .execute()
            .await
    }

    /// Fetch one order
    pub async fn get(&self, id: i64) -> Result<Order, Error> {
        Fetch::get(&self.client, &self.order_url(id)).execute().await
    }

    /// Fetch the email thread of an order
    pub async fn emails(&self, id: i64) -> Result<Vec<EmailLog>, Error> {
        let url = format!("{}/emails", self.order_url(id));
        Fetch::get(&self.client, &url).execute().await
    }

    /// Ask the backend to move an order to another status
    pub async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
        notes: Option<&str>,
    ) -> Result<Value, Error> {
        let url = format!("{}/status", self.order_url(id));
        let body = StatusUpdate {
            status,
            notes: notes.map(str::to_string),
        };
        Fetch::put(&self.client, &url)
            .json(&body)?
            .execute_value()
            .await
    }

    /// Attach a workflow task to an order
    pub async fn add_task(
        &self,
        id: i64,
        task_type: &str,
        parameters: Option<Value>,
    ) -> Result<Value, Error> {
        let url = format!("{}/tasks", self.order_url(id));
        let body = NewTask {
            task_type: task_type.to_string(),
            parameters,
        };
        Fetch::post(&self.client, &url)
            .json(&body)?
            .execute_value()
            .await
    }

    /// Send an email reply to the order's customer
    pub async fn respond(&self, id: i64, reply: &EmailReply) -> Result<Value, Error> {
        let url = format!("{}/respond", self.order_url(id));
        Fetch::post(&self.client, &url)
            .json(reply)?
            .execute_value()
            .await
    }

    /// Ask the backend for an AI drafted reply
    pub async fn generate_response(&self, id: i64) -> Result<GeneratedResponse, Error> {
        let url = format!("{}/generate-response", self.order_url(id));
        Fetch::post(&self.client, &url).execute().await
    }

    /// Direct download link for the sales order PDF
    pub fn pdf_url(&self, id: i64) -> String {
        format!("{}/generate-pdf", self.order_url(id))
    }

    /// Default file name for a downloaded sales order
    pub fn pdf_file_name(id: i64) -> String {
        format!("Sales_Order_{}.pdf", id)
    }

    /// Download the sales order PDF through the direct link
    pub async fn download_pdf(&self, id: i64) -> Result<Vec<u8>, Error> {
        Fetch::get(&self.client, &self.pdf_url(id))
            .header("Accept", "application/pdf")
            .execute_bytes()
            .await
    }

    /// Generate the sales order PDF and return its bytes
    pub async fn generate_pdf(&self, id: i64) -> Result<Vec<u8>, Error> {
        Fetch::post(&self.client, &self.pdf_url(id))
            .header("Accept", "application/pdf")
            .execute_bytes()
            .await
    }

    /// Trigger backend workflow advancement for all orders
    pub async fn process_workflow(&self) -> Result<Value, Error> {
        let url = format!("{}/api/process-workflow", self.url);
        Fetch::post(&self.client, &url).execute_value().await
    }

    /// Orders still in `inquiry`
    pub async fn inquiries(&self) -> Result<Vec<Order>, Error> {
        let orders = self.list(&ListOrders::new().limit(self.list_limit)).await?;
        Ok(views::inquiries(orders))
    }

    /// Completed orders, filtered server-side
    pub async fn completed(&self) -> Result<Vec<Order>, Error> {
        let query = ListOrders::new()
            .status(OrderStatus::Completed)
            .limit(self.list_limit);
        let orders = self.list(&query).await?;
        Ok(views::completed(orders))
    }

    /// Every order that is not completed
    pub async fn active(&self) -> Result<Vec<Order>, Error> {
        let orders = self.list(&ListOrders::new().limit(self.list_limit)).await?;
        Ok(views::active(orders))
    }
}
