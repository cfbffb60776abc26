use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::SystemError;
use crate::actor_framework::ResourceActor;
use crate::clients::{CouponClient, CustomerClient, OrderClient, ProductClient, ReportClient};
use crate::config::BackOfficeConfig;
use crate::domain::{Coupon, Customer, Order, Product};
use crate::pricing::MassDiscountPreviewItem;
use crate::product_actor::ProductError;
use crate::settings::{SettingsDocument, SiteSettings};

/// Sequential ids of the form `{prefix}_{n}`, starting at 1.
fn id_sequence(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}

/// One actor per table plus the clients that front them.
///
/// Startup wires the order client to the customer, product and coupon
/// clients it consults while placing orders.
pub struct BackOfficeSystem {
    pub order_client: OrderClient,
    pub product_client: ProductClient,
    pub customer_client: CustomerClient,
    pub coupon_client: CouponClient,
    pub report_client: ReportClient,
    pub settings: SettingsDocument,
    handles: Vec<JoinHandle<()>>,
}

impl BackOfficeSystem {
    pub fn new(config: &BackOfficeConfig) -> Self {
        let buffer = config.channel_buffer;

        let (customer_actor, customer_resource_client) =
            ResourceActor::<Customer>::new("customers", buffer, id_sequence("customer"));
        let customer_client = CustomerClient::new(customer_resource_client);
        let customer_handle = tokio::spawn(customer_actor.run());

        let (product_actor, product_resource_client) =
            ResourceActor::<Product>::new("products", buffer, id_sequence("product"));
        let product_client = ProductClient::new(product_resource_client);
        let product_handle = tokio::spawn(product_actor.run());

        let (coupon_actor, coupon_resource_client) =
            ResourceActor::<Coupon>::new("coupons", buffer, id_sequence("coupon"));
        let coupon_client = CouponClient::new(coupon_resource_client);
        let coupon_handle = tokio::spawn(coupon_actor.run());

        let (order_actor, order_resource_client) = ResourceActor::<Order>::new("orders", buffer, id_sequence("order"));
        let order_client = OrderClient::new(
            order_resource_client,
            customer_client.clone(),
            product_client.clone(),
            coupon_client.clone(),
        );
        let order_handle = tokio::spawn(order_actor.run());

        let settings = SettingsDocument::new(SiteSettings::from_config(config));
        let report_client = ReportClient::new(
            order_client.clone(),
            product_client.clone(),
            customer_client.clone(),
            settings.published(),
        );

        info!(buffer, "Back office actors started");

        Self {
            order_client,
            product_client,
            customer_client,
            coupon_client,
            report_client,
            settings,
            handles: vec![customer_handle, product_handle, coupon_handle, order_handle],
        }
    }

    /// Publishes the settings draft and rebuilds the report client so new
    /// reports read the published values.
    pub fn publish_settings(&mut self) -> bool {
        if !self.settings.publish() {
            return false;
        }
        self.report_client = ReportClient::new(
            self.order_client.clone(),
            self.product_client.clone(),
            self.customer_client.clone(),
            self.settings.published(),
        );
        true
    }

    /// Mass discount preview sized by the published `preview_limit`.
    pub async fn preview_mass_discount(&self, percent: f64) -> Result<Vec<MassDiscountPreviewItem>, ProductError> {
        let limit = self.settings.published().preview_limit;
        self.product_client.preview_mass_discount(percent, limit).await
    }

    /// Stops the order actor first, since it is the only one that calls the
    /// others, then the remaining tables.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down back office...");

        if let Err(e) = self.order_client.shutdown().await {
            warn!(error = %e, "Order actor already stopped");
        }
        if let Err(e) = self.coupon_client.shutdown().await {
            warn!(error = %e, "Coupon actor already stopped");
        }
        if let Err(e) = self.product_client.shutdown().await {
            warn!(error = %e, "Product actor already stopped");
        }
        if let Err(e) = self.customer_client.shutdown().await {
            warn!(error = %e, "Customer actor already stopped");
        }

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::ActorTask(e.to_string()));
            }
        }

        info!("Back office shutdown complete.");
        Ok(())
    }
}
