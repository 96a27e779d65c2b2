use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
        customers::{CreateCustomerRequest, CustomerList, UpdateCustomerRequest},
        orders::{OrderLineDetail, OrderList, OrderSummary, OrderWithLines},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        reports::{
            AnnualSalesRow, CategoryQuantityRow, CategoryRevenueRow, CustomerOrderCountRow,
            MonthSales, MonthlyAverages, MonthlyComparison, MonthlySalesRow, OrderTotalRow,
            OrderYears, ProductQuantityRow, ProductRevenueRow, PurchaseSummaryRow,
            RankedProductRow, SalesAnalysisReport, SalesSeriesRow, StatusReport,
            TopBottomReport, YearSalesAnalysis, YearTotalRow,
        },
    },
    models::{Category, Customer, Order, OrderLine, Product},
    response::{ApiResponse, Meta},
    routes::{categories, customers, health, orders, params, products, reports},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        customers::list_customers,
        customers::get_customer,
        customers::create_customer,
        customers::update_customer,
        customers::delete_customer,
        customers::customer_orders,
        customers::customer_status,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::product_status,
        orders::get_order,
        reports::order_years,
        reports::orders_by_date,
        reports::annual_orders,
        reports::customer_products,
        reports::customer_categories,
        reports::top_customers,
        reports::top_bottom_products,
        reports::product_sales_series,
        reports::product_sales_analysis,
        reports::purchase_summary,
        reports::category_revenues,
        reports::category_sales,
        reports::annual_sales,
        reports::monthly_sales
    ),
    components(
        schemas(
            Category,
            Customer,
            Product,
            Order,
            OrderLine,
            CategoryList,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CustomerList,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            ProductList,
            CreateProductRequest,
            UpdateProductRequest,
            OrderList,
            OrderSummary,
            OrderLineDetail,
            OrderWithLines,
            OrderYears,
            StatusReport,
            YearTotalRow,
            OrderTotalRow,
            ProductRevenueRow,
            ProductQuantityRow,
            CategoryRevenueRow,
            CategoryQuantityRow,
            SalesSeriesRow,
            AnnualSalesRow,
            MonthlySalesRow,
            RankedProductRow,
            CustomerOrderCountRow,
            PurchaseSummaryRow,
            MonthlyAverages,
            MonthlyComparison,
            MonthSales,
            YearSalesAnalysis,
            SalesAnalysisReport,
            TopBottomReport,
            params::Pagination,
            params::CustomerQuery,
            params::ProductQuery,
            params::YearQuery,
            params::RankingQuery,
            reports::TopCustomersQuery,
            Meta,
            ApiResponse<Category>,
            ApiResponse<Customer>,
            ApiResponse<Product>,
            ApiResponse<CategoryList>,
            ApiResponse<CustomerList>,
            ApiResponse<ProductList>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithLines>,
            ApiResponse<OrderYears>,
            ApiResponse<StatusReport>,
            ApiResponse<SalesAnalysisReport>,
            ApiResponse<TopBottomReport>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Products", description = "Product endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Reports", description = "Sales analytics endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
