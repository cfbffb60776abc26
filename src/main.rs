use tracing::{error, info, warn, Instrument};

use storefront_backoffice::app_system::{setup_tracing, BackOfficeSystem};
use storefront_backoffice::config::BackOfficeConfig;
use storefront_backoffice::domain::{CouponCreate, CouponKind, CustomerCreate, OrderDraft, OrderLine, ProductCreate};
use storefront_backoffice::reports::{CustomerColumn, DateRange, ProductColumn, SortDirection, SortSpec};

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = BackOfficeConfig::from_env().map_err(|e| e.to_string())?;
    setup_tracing(&config);

    info!("Starting back office");

    let system = BackOfficeSystem::new(&config);

    let customer_id = system
        .customer_client
        .create_customer(CustomerCreate {
            full_name: "Alice Souza".to_string(),
            email: "alice@example.com".to_string(),
            ..CustomerCreate::default()
        })
        .await
        .map_err(|e| e.to_string())?;
    info!(customer_id = %customer_id, "Customer created successfully");

    let span = tracing::info_span!("catalog_setup");
    let (shirt_id, mug_id) = async {
        info!("Creating catalog");
        let shirt = system
            .product_client
            .create_product(ProductCreate {
                name: "Camiseta".to_string(),
                sku: Some("CAM-001".to_string()),
                price: 100.0,
                cost_price: Some(50.0),
                stock_quantity: 10,
                ..ProductCreate::default()
            })
            .await?;
        let mug = system
            .product_client
            .create_product(ProductCreate {
                name: "Caneca".to_string(),
                price: 50.0,
                cost_price: Some(45.0),
                stock_quantity: 3,
                ..ProductCreate::default()
            })
            .await?;
        Ok::<_, storefront_backoffice::product_actor::ProductError>((shirt, mug))
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    system
        .coupon_client
        .create_coupon(CouponCreate::new("welcome10", CouponKind::Percentage(10.0)))
        .await
        .map_err(|e| e.to_string())?;

    let mut draft = OrderDraft::new(
        customer_id.clone(),
        vec![OrderLine::new(shirt_id.clone(), 2).with_attribute("size", "M"), OrderLine::new(mug_id, 1)],
    );
    draft.shipping_cost = 15.0;
    draft.coupon_code = Some("WELCOME10".to_string());

    let span = tracing::info_span!("order_processing");
    let order_result = async {
        info!("Placing order");
        let order_id = system.order_client.create_order(draft).await?;
        system.order_client.advance_order(order_id.clone(), None).await?;
        system
            .order_client
            .link_payment(order_id.clone(), "credit_card".to_string(), "pay_123".to_string())
            .await?;
        system.order_client.set_fee_rate(order_id.clone(), Some(4.99)).await?;
        let net = system.order_client.net_amount(order_id.clone()).await?;
        Ok::<_, storefront_backoffice::order_actor::OrderError>((order_id, net))
    }
    .instrument(span)
    .await;

    match order_result {
        Ok((order_id, Some(net))) => info!(order_id = %order_id, fee = net.tax, net = net.net, "Order processed"),
        Ok((order_id, None)) => info!(order_id = %order_id, "Order processed without fee rate"),
        Err(e) => error!(error = %e, "Order processing failed"),
    }

    let preview = system
        .preview_mass_discount(20.0)
        .await
        .map_err(|e| e.to_string())?;
    for item in &preview {
        info!(product = %item.name, current_price = item.current_price, new_price = item.new_price, "Discount preview");
    }
    let outcome = system
        .product_client
        .apply_mass_discount(20.0)
        .await
        .map_err(|e| e.to_string())?;
    for warning in &outcome.below_cost_warnings {
        warn!(product = %warning.name, new_price = warning.new_price, cost = warning.cost_price, "Below cost");
    }

    let range = DateRange::all();
    let products = system
        .report_client
        .product_report(range, SortSpec::new(ProductColumn::Revenue, SortDirection::Descending))
        .await
        .map_err(|e| e.to_string())?;
    for row in &products {
        info!(product = %row.name, quantity = row.quantity, revenue = row.revenue, "Product report");
    }
    let customers = system
        .report_client
        .customer_report(range, SortSpec::new(CustomerColumn::TotalSpent, SortDirection::Descending))
        .await
        .map_err(|e| e.to_string())?;
    for row in &customers {
        info!(customer = %row.name, orders = row.order_count, spent = row.total_spent, "Customer report");
    }
    let summary = system.report_client.sales_summary(range).await.map_err(|e| e.to_string())?;
    info!(?summary, "Sales summary");

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Back office demo completed");
    Ok(())
}
