//! A small product catalogue searched by price range, brand and popularity.

mod common;

use common::{DemoResult, section};
use serde::{Deserialize, Serialize};
use sift::prelude::*;

const INDEX: &str = "products";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Product {
    id: String,
    name: String,
    brand: String,
    category: String,
    price: f64,
    color: String,
    size: String,
    rating: f64,
    stock_count: u32,
    sold_count: u32,
    create_date: String,
    is_available: bool,
}

/// Optional criteria for [`advanced_search`]; unset fields are not filtered on.
#[derive(Debug, Default)]
struct SearchParams {
    brand: Option<String>,
    min_rating: Option<f64>,
    in_stock: bool,
}

fn catalogue() -> Vec<Product> {
    let product = |id: &str, name: &str, brand: &str, price: f64, rating: f64, stock: u32, sold: u32| Product {
        id: id.to_string(),
        name: name.to_string(),
        brand: brand.to_string(),
        category: "shoes".to_string(),
        price,
        color: "black".to_string(),
        size: "42".to_string(),
        rating,
        stock_count: stock,
        sold_count: sold,
        create_date: "2024-09-22T10:00:00Z".to_string(),
        is_available: stock > 0,
    };

    vec![
        product("1", "Nike Air Max", "Nike", 1299.99, 4.5, 50, 150),
        product("2", "Nike Pegasus", "Nike", 1899.0, 4.7, 0, 310),
        product("3", "Adidas Ultraboost", "Adidas", 1599.5, 4.2, 12, 95),
    ]
}

async fn add_sample_products(client: &SearchClient) -> sift::Result<()> {
    for product in catalogue() {
        client.index_document(INDEX, &product, Some(&product.id)).await?;
    }
    client.refresh_index(INDEX).await
}

async fn search_by_price_and_category(
    client: &SearchClient,
    min_price: f64,
    max_price: f64,
    category: &str,
) -> sift::Result<Vec<Product>> {
    let query = BoolQuery::new()
        .must(RangeQuery::new("price").gte(min_price).lte(max_price))
        .must(Query::matches("category", category));
    let request = SearchRequest::with_query(query).sort_by("price", SortOrder::Asc);

    let response: SearchResponse<Product> = client.search(INDEX, &request).await?;
    Ok(response.documents().cloned().collect())
}

async fn advanced_search(client: &SearchClient, params: &SearchParams) -> sift::Result<Vec<Product>> {
    let mut query = BoolQuery::new();
    if let Some(brand) = &params.brand {
        query = query.must(Query::matches("brand", brand.as_str()));
    }
    if let Some(min_rating) = params.min_rating {
        query = query.must(RangeQuery::new("rating").gte(min_rating));
    }
    if params.in_stock {
        query = query.must(RangeQuery::new("stock_count").gt(0));
    }

    // an empty bool query matches everything
    let request = SearchRequest::with_query(query)
        .sort_by("rating", SortOrder::Desc)
        .size(20);

    let response: SearchResponse<Product> = client.search(INDEX, &request).await?;
    Ok(response.documents().cloned().collect())
}

async fn most_sold_products(client: &SearchClient, limit: u64) -> sift::Result<Vec<Product>> {
    let request = SearchRequest::new()
        .sort_by("sold_count", SortOrder::Desc)
        .size(limit);

    let response: SearchResponse<Product> = client.search(INDEX, &request).await?;
    Ok(response.documents().cloned().collect())
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("  (none)");
    }
    for p in products {
        println!(
            "  [{}] {} by {} - {:.2} (rating {}, stock {}, sold {})",
            p.id, p.name, p.brand, p.price, p.rating, p.stock_count, p.sold_count
        );
    }
    println!();
}

#[tokio::main]
async fn main() -> DemoResult {
    let client = common::connect("Sift Product Search Example").await?;

    section("Add sample products");
    add_sample_products(&client).await?;
    println!("Indexed {} products\n", catalogue().len());

    section("Price 1000-2000 in category shoes");
    let products = search_by_price_and_category(&client, 1000.0, 2000.0, "shoes").await?;
    print_products(&products);

    section("Nike, rating >= 4.0, in stock");
    let params = SearchParams {
        brand: Some("Nike".to_string()),
        min_rating: Some(4.0),
        in_stock: true,
    };
    print_products(&advanced_search(&client, &params).await?);

    section("Best sellers");
    print_products(&most_sold_products(&client, 10).await?);

    Ok(())
}
