//! Product catalog commands

use anyhow::Result;
use clap::Subcommand;

use super::output::{or_dash, Output};
use crate::domain::{ListId, Product, ProductUpdate, ScanCode};
use crate::storage::{Home, ProductSort};

#[derive(Subcommand)]
pub enum ProductCommands {
    /// Add a product to the catalog
    ///
    /// Examples:
    ///   shelfscan product add 4006381333931 "Pencils"
    ///   shelfscan product add 4000417025005 "Milk" --list 1234 --shelf A3
    Add {
        /// Scan code (EAN)
        ean: ScanCode,

        /// Display name, used as the task title
        name: String,

        /// Remote list the product goes to
        #[arg(long)]
        list: Option<ListId>,

        /// Tag id
        #[arg(long)]
        tag: Option<i64>,

        /// Shelf label used for sorting
        #[arg(long)]
        shelf: Option<String>,
    },

    /// Show product details
    Show {
        /// Scan code (EAN)
        ean: ScanCode,
    },

    /// Change fields of a product
    Update {
        /// Scan code (EAN)
        ean: ScanCode,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        list: Option<ListId>,

        #[arg(long)]
        tag: Option<i64>,

        #[arg(long)]
        shelf: Option<String>,
    },

    /// Remove a product from the catalog
    Remove {
        /// Scan code (EAN)
        ean: ScanCode,
    },

    /// List all products
    List {
        /// Column to sort by
        #[arg(long, value_enum, default_value = "name")]
        sort: ProductSort,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
}

pub fn run(cmd: ProductCommands, output: &Output, home: &Home) -> Result<()> {
    match cmd {
        ProductCommands::Add {
            ean,
            name,
            list,
            tag,
            shelf,
        } => {
            let mut product = Product::new(ean, name);
            product.list = list;
            product.tag = tag;
            product.shelf = shelf;
            add_product(output, home, product)
        }
        ProductCommands::Show { ean } => show_product(output, home, &ean),
        ProductCommands::Update {
            ean,
            name,
            list,
            tag,
            shelf,
        } => update_product(
            output,
            home,
            &ean,
            ProductUpdate {
                name,
                list,
                tag,
                shelf,
            },
        ),
        ProductCommands::Remove { ean } => remove_product(output, home, &ean),
        ProductCommands::List { sort, desc } => list_products(output, home, sort, desc),
    }
}

fn add_product(output: &Output, home: &Home, product: Product) -> Result<()> {
    let catalog = home.catalog()?;
    output.verbose_ctx("product", &format!("Adding {} to {}", product.ean, catalog.path().display()));

    catalog.add_product(&product)?;

    if output.is_json() {
        output.data(&product);
    } else {
        output.success(&format!("Added product: {} - {}", product.ean, product.name));
    }

    Ok(())
}

fn show_product(output: &Output, home: &Home, ean: &ScanCode) -> Result<()> {
    let catalog = home.catalog()?;
    let product = catalog
        .product(ean)?
        .ok_or_else(|| anyhow::anyhow!("Product not found: {}", ean))?;

    if output.is_json() {
        output.data(&product);
    } else {
        println!("EAN:    {}", product.ean);
        println!("Name:   {}", product.name);
        println!("List:   {}", or_dash(product.list));
        println!("Tag:    {}", or_dash(product.tag));
        println!("Shelf:  {}", or_dash(product.shelf.as_deref()));
        println!("Added:  {}", product.added_at.format("%Y-%m-%d %H:%M"));
    }

    Ok(())
}

fn update_product(output: &Output, home: &Home, ean: &ScanCode, update: ProductUpdate) -> Result<()> {
    if update.is_empty() {
        anyhow::bail!("Nothing to update. Pass --name, --list, --tag or --shelf.");
    }

    let catalog = home.catalog()?;
    let product = catalog.update_product(ean, update)?;

    if output.is_json() {
        output.data(&product);
    } else {
        output.success(&format!("Updated product: {} - {}", product.ean, product.name));
    }

    Ok(())
}

fn remove_product(output: &Output, home: &Home, ean: &ScanCode) -> Result<()> {
    let catalog = home.catalog()?;
    catalog.remove_product(ean)?;

    output.success(&format!("Removed product: {}", ean));
    Ok(())
}

fn list_products(output: &Output, home: &Home, sort: ProductSort, desc: bool) -> Result<()> {
    let catalog = home.catalog()?;
    let products = catalog.products(sort, desc)?;

    if output.is_json() {
        output.data(&products);
        return Ok(());
    }

    if products.is_empty() {
        println!("No products in the catalog.");
        return Ok(());
    }

    println!("{:<15} {:<30} {:<10} {:<6} SHELF", "EAN", "NAME", "LIST", "TAG");
    println!("{}", "-".repeat(70));
    for product in &products {
        println!(
            "{:<15} {:<30} {:<10} {:<6} {}",
            product.ean,
            product.name,
            or_dash(product.list),
            or_dash(product.tag),
            or_dash(product.shelf.as_deref())
        );
    }

    Ok(())
}
