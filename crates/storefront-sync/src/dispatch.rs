//! Action routing.
//!
//! UI code does not call stores directly. It sends an [`Action`] carrying the
//! inputs and a completion; the [`Dispatcher`] runs the store call on the
//! tokio runtime and hands the result to the completion on the storage main
//! context, after the write it caused is visible.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use storefront_model::{
    Coupon, CouponReport, MetaData, MetaDataUpdate, Order, OrderNote, OrderStats, OrderStatus,
    OrderUpdateField, Product, ProductAttributeTerm, Refund, ShipmentTracking,
    SimplePaymentsUpdate, SiteVisitStats, StatsTimeRange, TopEarnerStats,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::manager::StoresManager;
use crate::remote::OrderListFilter;
use crate::{AttributeTermError, ProductUpdateError, StoreResult};

/// Callback receiving the result of an action.
pub type Completion<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// A completion bound to its result, ready to run on the main context.
type Delivery = Box<dyn FnOnce() + Send + 'static>;

fn deliver<T: Send + 'static>(completion: Completion<T>, result: T) -> Delivery {
    Box::new(move || completion(result))
}

pub enum CouponAction {
    SynchronizeCoupons {
        site_id: i64,
        page: u32,
        page_size: usize,
        on_completion: Completion<StoreResult<bool>>,
    },
    SynchronizeAllCoupons {
        site_id: i64,
        on_completion: Completion<StoreResult<usize>>,
    },
    SearchCoupons {
        site_id: i64,
        keyword: String,
        page: u32,
        page_size: usize,
        on_completion: Completion<StoreResult<bool>>,
    },
    RetrieveCoupon {
        site_id: i64,
        coupon_id: i64,
        on_completion: Completion<StoreResult<Coupon>>,
    },
    CreateCoupon {
        coupon: Coupon,
        on_completion: Completion<StoreResult<Coupon>>,
    },
    UpdateCoupon {
        coupon: Coupon,
        on_completion: Completion<StoreResult<Coupon>>,
    },
    DeleteCoupon {
        site_id: i64,
        coupon_id: i64,
        on_completion: Completion<StoreResult<Coupon>>,
    },
    LoadCouponReport {
        site_id: i64,
        coupon_id: i64,
        from: DateTime<Utc>,
        on_completion: Completion<StoreResult<CouponReport>>,
    },
    ResetStoredCoupons {
        on_completion: Completion<StoreResult<usize>>,
    },
}

pub enum OrderAction {
    SynchronizeOrders {
        site_id: i64,
        filter: OrderListFilter,
        page: u32,
        page_size: usize,
        on_completion: Completion<StoreResult<bool>>,
    },
    SynchronizeAllOrders {
        site_id: i64,
        filter: OrderListFilter,
        on_completion: Completion<StoreResult<usize>>,
    },
    FetchFilteredOrders {
        site_id: i64,
        filter: OrderListFilter,
        delete_all_before_saving: bool,
        page_size: usize,
        on_completion: Completion<StoreResult<bool>>,
    },
    SearchOrders {
        site_id: i64,
        keyword: String,
        page: u32,
        page_size: usize,
        on_completion: Completion<StoreResult<bool>>,
    },
    RetrieveOrder {
        site_id: i64,
        order_id: i64,
        on_completion: Completion<StoreResult<Order>>,
    },
    CreateOrder {
        site_id: i64,
        order: Order,
        fields: Vec<OrderUpdateField>,
        on_completion: Completion<StoreResult<Order>>,
    },
    UpdateOrder {
        site_id: i64,
        order: Order,
        fields: Vec<OrderUpdateField>,
        on_completion: Completion<StoreResult<Order>>,
    },
    CreateSimplePaymentsOrder {
        site_id: i64,
        status: OrderStatus,
        amount: String,
        taxable: bool,
        on_completion: Completion<StoreResult<Order>>,
    },
    UpdateSimplePaymentsOrder {
        site_id: i64,
        update: SimplePaymentsUpdate,
        on_completion: Completion<StoreResult<Order>>,
    },
    UpdateOrderStatus {
        site_id: i64,
        order_id: i64,
        status: OrderStatus,
        on_completion: Completion<StoreResult<Order>>,
    },
    UpdateOrderOptimistically {
        site_id: i64,
        order: Order,
        fields: Vec<OrderUpdateField>,
        on_completion: Completion<StoreResult<Order>>,
    },
    DeleteOrder {
        site_id: i64,
        order: Order,
        force: bool,
        on_completion: Completion<StoreResult<Order>>,
    },
    MarkOrderAsPaidLocally {
        site_id: i64,
        order_id: i64,
        date_paid: DateTime<Utc>,
        on_completion: Completion<StoreResult<Order>>,
    },
    CheckIfStoreHasOrders {
        site_id: i64,
        on_completion: Completion<StoreResult<bool>>,
    },
    ResetStoredOrders {
        on_completion: Completion<StoreResult<usize>>,
    },
}

pub enum ProductAction {
    SynchronizeProducts {
        site_id: i64,
        page: u32,
        page_size: usize,
        on_completion: Completion<StoreResult<bool>>,
    },
    SynchronizeAllProducts {
        site_id: i64,
        on_completion: Completion<StoreResult<usize>>,
    },
    SearchProducts {
        site_id: i64,
        keyword: String,
        filter: Option<String>,
        page: u32,
        page_size: usize,
        on_completion: Completion<StoreResult<bool>>,
    },
    RetrieveProduct {
        site_id: i64,
        product_id: i64,
        on_completion: Completion<StoreResult<Product>>,
    },
    RetrieveProducts {
        site_id: i64,
        product_ids: Vec<i64>,
        on_completion: Completion<StoreResult<Vec<Product>>>,
    },
    RequestMissingProducts {
        order: Order,
        on_completion: Completion<StoreResult<usize>>,
    },
    UpdateProduct {
        product: Product,
        on_completion: Completion<Result<Product, ProductUpdateError>>,
    },
    ValidateProductSku {
        site_id: i64,
        sku: Option<String>,
        on_completion: Completion<bool>,
    },
    ResetStoredProducts {
        on_completion: Completion<StoreResult<usize>>,
    },
}

pub enum RefundAction {
    SynchronizeRefunds {
        site_id: i64,
        order_id: i64,
        page: u32,
        page_size: usize,
        on_completion: Completion<StoreResult<bool>>,
    },
    RetrieveRefund {
        site_id: i64,
        order_id: i64,
        refund_id: i64,
        on_completion: Completion<StoreResult<Refund>>,
    },
    RetrieveRefunds {
        site_id: i64,
        order_id: i64,
        refund_ids: Vec<i64>,
        on_completion: Completion<StoreResult<Vec<Refund>>>,
    },
    CreateRefund {
        site_id: i64,
        order_id: i64,
        refund: Refund,
        on_completion: Completion<StoreResult<Refund>>,
    },
    ResetStoredRefunds {
        on_completion: Completion<StoreResult<usize>>,
    },
}

pub enum MetaDataAction {
    UpdateOrderMetaData {
        site_id: i64,
        order_id: i64,
        updates: Vec<MetaDataUpdate>,
        on_completion: Completion<StoreResult<Vec<MetaData>>>,
    },
    UpdateProductMetaData {
        site_id: i64,
        product_id: i64,
        updates: Vec<MetaDataUpdate>,
        on_completion: Completion<StoreResult<Vec<MetaData>>>,
    },
}

pub enum OrderNoteAction {
    SynchronizeOrderNotes {
        site_id: i64,
        order_id: i64,
        on_completion: Completion<StoreResult<Vec<OrderNote>>>,
    },
    AddOrderNote {
        site_id: i64,
        order_id: i64,
        is_customer_note: bool,
        note: String,
        on_completion: Completion<StoreResult<OrderNote>>,
    },
}

pub enum AttributeTermAction {
    SynchronizeAllTerms {
        site_id: i64,
        attribute_id: i64,
        on_completion: Completion<Result<usize, AttributeTermError>>,
    },
    CreateTerm {
        site_id: i64,
        attribute_id: i64,
        name: String,
        on_completion: Completion<StoreResult<ProductAttributeTerm>>,
    },
}

pub enum StatsAction {
    RetrieveStats {
        site_id: i64,
        time_range: StatsTimeRange,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
        quantity: u32,
        on_completion: Completion<StoreResult<OrderStats>>,
    },
    RetrieveSiteVisitStats {
        site_id: i64,
        time_range: StatsTimeRange,
        latest: DateTime<Utc>,
        on_completion: Completion<StoreResult<SiteVisitStats>>,
    },
    RetrieveTopEarnerStats {
        site_id: i64,
        time_range: StatsTimeRange,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
        on_completion: Completion<StoreResult<TopEarnerStats>>,
    },
    ResetStoredStats {
        on_completion: Completion<StoreResult<usize>>,
    },
}

pub enum ShipmentAction {
    SynchronizeShipmentTrackings {
        site_id: i64,
        order_id: i64,
        on_completion: Completion<StoreResult<usize>>,
    },
    SynchronizeTrackingProviders {
        site_id: i64,
        order_id: i64,
        on_completion: Completion<StoreResult<usize>>,
    },
    AddTracking {
        site_id: i64,
        order_id: i64,
        provider: String,
        tracking_number: String,
        date_shipped: DateTime<Utc>,
        on_completion: Completion<StoreResult<ShipmentTracking>>,
    },
    AddCustomTracking {
        site_id: i64,
        order_id: i64,
        provider: String,
        tracking_number: String,
        tracking_url: String,
        date_shipped: DateTime<Utc>,
        on_completion: Completion<StoreResult<ShipmentTracking>>,
    },
    DeleteTracking {
        site_id: i64,
        order_id: i64,
        tracking_id: String,
        on_completion: Completion<StoreResult<ShipmentTracking>>,
    },
}

/// Everything the dispatcher can route.
pub enum Action {
    Coupon(CouponAction),
    Order(OrderAction),
    Product(ProductAction),
    Refund(RefundAction),
    MetaData(MetaDataAction),
    OrderNote(OrderNoteAction),
    AttributeTerm(AttributeTermAction),
    Stats(StatsAction),
    Shipment(ShipmentAction),
}

impl Action {
    /// Domain name, for logs.
    pub fn domain(&self) -> &'static str {
        match self {
            Self::Coupon(_) => "coupons",
            Self::Order(_) => "orders",
            Self::Product(_) => "products",
            Self::Refund(_) => "refunds",
            Self::MetaData(_) => "metadata",
            Self::OrderNote(_) => "order_notes",
            Self::AttributeTerm(_) => "attribute_terms",
            Self::Stats(_) => "stats",
            Self::Shipment(_) => "shipments",
        }
    }
}

/// Runs actions against a [`StoresManager`].
#[derive(Clone)]
pub struct Dispatcher {
    stores: Arc<StoresManager>,
    runtime: Handle,
}

impl Dispatcher {
    pub fn new(stores: Arc<StoresManager>, runtime: Handle) -> Self {
        Self { stores, runtime }
    }

    /// Dispatcher on the runtime of the calling task.
    ///
    /// Panics outside a tokio runtime, like [`Handle::current`].
    pub fn current(stores: Arc<StoresManager>) -> Self {
        Self::new(stores, Handle::current())
    }

    pub fn stores(&self) -> &Arc<StoresManager> {
        &self.stores
    }

    /// Starts `action`. Its completion runs on the storage main context.
    pub fn dispatch(&self, action: Action) -> JoinHandle<()> {
        let domain = action.domain();
        let stores = self.stores.clone();
        let work = route(stores.clone(), action);

        self.runtime.spawn(async move {
            let delivery = work.await;
            debug!(domain, "dispatch: action finished");
            stores.storage().main_context().run(delivery);
        })
    }
}

fn route(stores: Arc<StoresManager>, action: Action) -> BoxFuture<'static, Delivery> {
    match action {
        Action::Coupon(action) => route_coupon(stores, action),
        Action::Order(action) => route_order(stores, action),
        Action::Product(action) => route_product(stores, action),
        Action::Refund(action) => route_refund(stores, action),
        Action::MetaData(action) => route_metadata(stores, action),
        Action::OrderNote(action) => route_order_note(stores, action),
        Action::AttributeTerm(action) => route_attribute_term(stores, action),
        Action::Stats(action) => route_stats(stores, action),
        Action::Shipment(action) => route_shipment(stores, action),
    }
}

fn route_coupon(stores: Arc<StoresManager>, action: CouponAction) -> BoxFuture<'static, Delivery> {
    async move {
        let coupons = stores.coupons();
        match action {
            CouponAction::SynchronizeCoupons {
                site_id,
                page,
                page_size,
                on_completion,
            } => deliver(
                on_completion,
                coupons.synchronize_coupons(site_id, page, page_size).await,
            ),
            CouponAction::SynchronizeAllCoupons {
                site_id,
                on_completion,
            } => deliver(on_completion, coupons.synchronize_all_coupons(site_id).await),
            CouponAction::SearchCoupons {
                site_id,
                keyword,
                page,
                page_size,
                on_completion,
            } => deliver(
                on_completion,
                coupons
                    .search_coupons(site_id, &keyword, page, page_size)
                    .await,
            ),
            CouponAction::RetrieveCoupon {
                site_id,
                coupon_id,
                on_completion,
            } => deliver(on_completion, coupons.retrieve_coupon(site_id, coupon_id).await),
            CouponAction::CreateCoupon {
                coupon,
                on_completion,
            } => deliver(on_completion, coupons.create_coupon(&coupon).await),
            CouponAction::UpdateCoupon {
                coupon,
                on_completion,
            } => deliver(on_completion, coupons.update_coupon(&coupon).await),
            CouponAction::DeleteCoupon {
                site_id,
                coupon_id,
                on_completion,
            } => deliver(on_completion, coupons.delete_coupon(site_id, coupon_id).await),
            CouponAction::LoadCouponReport {
                site_id,
                coupon_id,
                from,
                on_completion,
            } => deliver(
                on_completion,
                coupons.load_coupon_report(site_id, coupon_id, from).await,
            ),
            CouponAction::ResetStoredCoupons { on_completion } => {
                deliver(on_completion, coupons.reset_stored_coupons().await)
            }
        }
    }
    .boxed()
}

fn route_order(stores: Arc<StoresManager>, action: OrderAction) -> BoxFuture<'static, Delivery> {
    async move {
        let orders = stores.orders();
        match action {
            OrderAction::SynchronizeOrders {
                site_id,
                filter,
                page,
                page_size,
                on_completion,
            } => deliver(
                on_completion,
                orders
                    .synchronize_orders(site_id, &filter, page, page_size)
                    .await,
            ),
            OrderAction::SynchronizeAllOrders {
                site_id,
                filter,
                on_completion,
            } => deliver(
                on_completion,
                orders.synchronize_all_orders(site_id, &filter).await,
            ),
            OrderAction::FetchFilteredOrders {
                site_id,
                filter,
                delete_all_before_saving,
                page_size,
                on_completion,
            } => deliver(
                on_completion,
                orders
                    .fetch_filtered_orders(site_id, &filter, delete_all_before_saving, page_size)
                    .await,
            ),
            OrderAction::SearchOrders {
                site_id,
                keyword,
                page,
                page_size,
                on_completion,
            } => deliver(
                on_completion,
                orders.search_orders(site_id, &keyword, page, page_size).await,
            ),
            OrderAction::RetrieveOrder {
                site_id,
                order_id,
                on_completion,
            } => deliver(on_completion, orders.retrieve_order(site_id, order_id).await),
            OrderAction::CreateOrder {
                site_id,
                order,
                fields,
                on_completion,
            } => deliver(
                on_completion,
                orders.create_order(site_id, &order, &fields).await,
            ),
            OrderAction::UpdateOrder {
                site_id,
                order,
                fields,
                on_completion,
            } => deliver(
                on_completion,
                orders.update_order(site_id, &order, &fields).await,
            ),
            OrderAction::CreateSimplePaymentsOrder {
                site_id,
                status,
                amount,
                taxable,
                on_completion,
            } => deliver(
                on_completion,
                orders
                    .create_simple_payments_order(site_id, status, &amount, taxable)
                    .await,
            ),
            OrderAction::UpdateSimplePaymentsOrder {
                site_id,
                update,
                on_completion,
            } => deliver(
                on_completion,
                orders.update_simple_payments_order(site_id, &update).await,
            ),
            OrderAction::UpdateOrderStatus {
                site_id,
                order_id,
                status,
                on_completion,
            } => deliver(
                on_completion,
                orders.update_order_status(site_id, order_id, status).await,
            ),
            OrderAction::UpdateOrderOptimistically {
                site_id,
                order,
                fields,
                on_completion,
            } => deliver(
                on_completion,
                orders
                    .update_order_optimistically(site_id, &order, &fields)
                    .await,
            ),
            OrderAction::DeleteOrder {
                site_id,
                order,
                force,
                on_completion,
            } => deliver(
                on_completion,
                orders.delete_order(site_id, &order, force).await,
            ),
            OrderAction::MarkOrderAsPaidLocally {
                site_id,
                order_id,
                date_paid,
                on_completion,
            } => deliver(
                on_completion,
                orders
                    .mark_order_as_paid_locally(site_id, order_id, date_paid)
                    .await,
            ),
            OrderAction::CheckIfStoreHasOrders {
                site_id,
                on_completion,
            } => deliver(on_completion, orders.check_if_store_has_orders(site_id).await),
            OrderAction::ResetStoredOrders { on_completion } => {
                deliver(on_completion, orders.reset_stored_orders().await)
            }
        }
    }
    .boxed()
}

fn route_product(
    stores: Arc<StoresManager>,
    action: ProductAction,
) -> BoxFuture<'static, Delivery> {
    async move {
        let products = stores.products();
        match action {
            ProductAction::SynchronizeProducts {
                site_id,
                page,
                page_size,
                on_completion,
            } => deliver(
                on_completion,
                products.synchronize_products(site_id, page, page_size).await,
            ),
            ProductAction::SynchronizeAllProducts {
                site_id,
                on_completion,
            } => deliver(on_completion, products.synchronize_all_products(site_id).await),
            ProductAction::SearchProducts {
                site_id,
                keyword,
                filter,
                page,
                page_size,
                on_completion,
            } => deliver(
                on_completion,
                products
                    .search_products(site_id, &keyword, filter.as_deref(), page, page_size)
                    .await,
            ),
            ProductAction::RetrieveProduct {
                site_id,
                product_id,
                on_completion,
            } => deliver(
                on_completion,
                products.retrieve_product(site_id, product_id).await,
            ),
            ProductAction::RetrieveProducts {
                site_id,
                product_ids,
                on_completion,
            } => deliver(
                on_completion,
                products.retrieve_products(site_id, &product_ids).await,
            ),
            ProductAction::RequestMissingProducts {
                order,
                on_completion,
            } => deliver(on_completion, products.request_missing_products(&order).await),
            ProductAction::UpdateProduct {
                product,
                on_completion,
            } => deliver(on_completion, products.update_product(&product).await),
            ProductAction::ValidateProductSku {
                site_id,
                sku,
                on_completion,
            } => deliver(
                on_completion,
                products.validate_product_sku(site_id, sku.as_deref()),
            ),
            ProductAction::ResetStoredProducts { on_completion } => {
                deliver(on_completion, products.reset_stored_products().await)
            }
        }
    }
    .boxed()
}

fn route_refund(stores: Arc<StoresManager>, action: RefundAction) -> BoxFuture<'static, Delivery> {
    async move {
        let refunds = stores.refunds();
        match action {
            RefundAction::SynchronizeRefunds {
                site_id,
                order_id,
                page,
                page_size,
                on_completion,
            } => deliver(
                on_completion,
                refunds
                    .synchronize_refunds(site_id, order_id, page, page_size)
                    .await,
            ),
            RefundAction::RetrieveRefund {
                site_id,
                order_id,
                refund_id,
                on_completion,
            } => deliver(
                on_completion,
                refunds.retrieve_refund(site_id, order_id, refund_id).await,
            ),
            RefundAction::RetrieveRefunds {
                site_id,
                order_id,
                refund_ids,
                on_completion,
            } => deliver(
                on_completion,
                refunds
                    .retrieve_refunds(site_id, order_id, &refund_ids)
                    .await,
            ),
            RefundAction::CreateRefund {
                site_id,
                order_id,
                refund,
                on_completion,
            } => deliver(
                on_completion,
                refunds.create_refund(site_id, order_id, &refund).await,
            ),
            RefundAction::ResetStoredRefunds { on_completion } => {
                deliver(on_completion, refunds.reset_stored_refunds().await)
            }
        }
    }
    .boxed()
}

fn route_metadata(
    stores: Arc<StoresManager>,
    action: MetaDataAction,
) -> BoxFuture<'static, Delivery> {
    async move {
        let metadata = stores.metadata();
        match action {
            MetaDataAction::UpdateOrderMetaData {
                site_id,
                order_id,
                updates,
                on_completion,
            } => deliver(
                on_completion,
                metadata
                    .update_order_metadata(site_id, order_id, &updates)
                    .await,
            ),
            MetaDataAction::UpdateProductMetaData {
                site_id,
                product_id,
                updates,
                on_completion,
            } => deliver(
                on_completion,
                metadata
                    .update_product_metadata(site_id, product_id, &updates)
                    .await,
            ),
        }
    }
    .boxed()
}

fn route_order_note(
    stores: Arc<StoresManager>,
    action: OrderNoteAction,
) -> BoxFuture<'static, Delivery> {
    async move {
        let notes = stores.order_notes();
        match action {
            OrderNoteAction::SynchronizeOrderNotes {
                site_id,
                order_id,
                on_completion,
            } => deliver(
                on_completion,
                notes.synchronize_order_notes(site_id, order_id).await,
            ),
            OrderNoteAction::AddOrderNote {
                site_id,
                order_id,
                is_customer_note,
                note,
                on_completion,
            } => deliver(
                on_completion,
                notes
                    .add_order_note(site_id, order_id, is_customer_note, &note)
                    .await,
            ),
        }
    }
    .boxed()
}

fn route_attribute_term(
    stores: Arc<StoresManager>,
    action: AttributeTermAction,
) -> BoxFuture<'static, Delivery> {
    async move {
        let terms = stores.attribute_terms();
        match action {
            AttributeTermAction::SynchronizeAllTerms {
                site_id,
                attribute_id,
                on_completion,
            } => deliver(
                on_completion,
                terms.synchronize_all_terms(site_id, attribute_id).await,
            ),
            AttributeTermAction::CreateTerm {
                site_id,
                attribute_id,
                name,
                on_completion,
            } => deliver(
                on_completion,
                terms.create_term(site_id, attribute_id, &name).await,
            ),
        }
    }
    .boxed()
}

fn route_stats(stores: Arc<StoresManager>, action: StatsAction) -> BoxFuture<'static, Delivery> {
    async move {
        let stats = stores.stats();
        match action {
            StatsAction::RetrieveStats {
                site_id,
                time_range,
                earliest,
                latest,
                quantity,
                on_completion,
            } => deliver(
                on_completion,
                stats
                    .retrieve_stats(site_id, time_range, earliest, latest, quantity)
                    .await,
            ),
            StatsAction::RetrieveSiteVisitStats {
                site_id,
                time_range,
                latest,
                on_completion,
            } => deliver(
                on_completion,
                stats
                    .retrieve_site_visit_stats(site_id, time_range, latest)
                    .await,
            ),
            StatsAction::RetrieveTopEarnerStats {
                site_id,
                time_range,
                earliest,
                latest,
                on_completion,
            } => deliver(
                on_completion,
                stats
                    .retrieve_top_earner_stats(site_id, time_range, earliest, latest)
                    .await,
            ),
            StatsAction::ResetStoredStats { on_completion } => {
                deliver(on_completion, stats.reset_stored_stats().await)
            }
        }
    }
    .boxed()
}

fn route_shipment(
    stores: Arc<StoresManager>,
    action: ShipmentAction,
) -> BoxFuture<'static, Delivery> {
    async move {
        let shipments = stores.shipments();
        match action {
            ShipmentAction::SynchronizeShipmentTrackings {
                site_id,
                order_id,
                on_completion,
            } => deliver(
                on_completion,
                shipments
                    .synchronize_shipment_trackings(site_id, order_id)
                    .await,
            ),
            ShipmentAction::SynchronizeTrackingProviders {
                site_id,
                order_id,
                on_completion,
            } => deliver(
                on_completion,
                shipments
                    .synchronize_tracking_providers(site_id, order_id)
                    .await,
            ),
            ShipmentAction::AddTracking {
                site_id,
                order_id,
                provider,
                tracking_number,
                date_shipped,
                on_completion,
            } => deliver(
                on_completion,
                shipments
                    .add_tracking(site_id, order_id, &provider, &tracking_number, date_shipped)
                    .await,
            ),
            ShipmentAction::AddCustomTracking {
                site_id,
                order_id,
                provider,
                tracking_number,
                tracking_url,
                date_shipped,
                on_completion,
            } => deliver(
                on_completion,
                shipments
                    .add_custom_tracking(
                        site_id,
                        order_id,
                        &provider,
                        &tracking_number,
                        &tracking_url,
                        date_shipped,
                    )
                    .await,
            ),
            ShipmentAction::DeleteTracking {
                site_id,
                order_id,
                tracking_id,
                on_completion,
            } => deliver(
                on_completion,
                shipments
                    .delete_tracking(site_id, order_id, &tracking_id)
                    .await,
            ),
        }
    }
    .boxed()
}
