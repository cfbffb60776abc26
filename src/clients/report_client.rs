use std::sync::Arc;

use tracing::{info, instrument};

use crate::clients::{CustomerClient, OrderClient, ProductClient};
use crate::domain::Product;
use crate::reports::{
    self, CustomerColumn, CustomerReportRow, DateRange, ProductColumn, ProductReportRow, ReportError, SalesSummary,
    SortSpec,
};
use crate::settings::SiteSettings;

/// Fetches the rows each report tab needs and reduces them.
#[derive(Clone)]
pub struct ReportClient {
    order_client: OrderClient,
    product_client: ProductClient,
    customer_client: CustomerClient,
    settings: Arc<SiteSettings>,
}

impl ReportClient {
    pub fn new(
        order_client: OrderClient,
        product_client: ProductClient,
        customer_client: CustomerClient,
        settings: Arc<SiteSettings>,
    ) -> Self {
        Self {
            order_client,
            product_client,
            customer_client,
            settings,
        }
    }

    #[instrument(skip(self))]
    pub async fn product_report(
        &self,
        range: DateRange,
        sort: SortSpec<ProductColumn>,
    ) -> Result<Vec<ProductReportRow>, ReportError> {
        let orders = self.order_client.list_orders().await?;
        let products = self.product_client.list_products().await?;

        let mut rows = reports::product_report(&orders, &products, &range);
        reports::sort_rows(&mut rows, sort);
        info!(row_count = rows.len(), "Product report built");
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn customer_report(
        &self,
        range: DateRange,
        sort: SortSpec<CustomerColumn>,
    ) -> Result<Vec<CustomerReportRow>, ReportError> {
        let orders = self.order_client.list_orders().await?;
        let customers = self.customer_client.list_customers().await?;

        let mut rows = reports::customer_report(&orders, &customers, &range);
        reports::sort_rows(&mut rows, sort);
        info!(row_count = rows.len(), "Customer report built");
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn sales_summary(&self, range: DateRange) -> Result<SalesSummary, ReportError> {
        let orders = self.order_client.list_orders().await?;
        let summary = reports::sales_summary(&orders, &range);
        info!(
            orders = summary.order_count,
            gross_revenue = summary.gross_revenue,
            currency = %self.settings.currency,
            "Sales summary built"
        );
        Ok(summary)
    }

    /// Active products at or below the store's low-stock threshold.
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<Product>, ReportError> {
        let products = self.product_client.list_products().await?;
        Ok(reports::low_stock(&products, self.settings.low_stock_threshold))
    }
}
