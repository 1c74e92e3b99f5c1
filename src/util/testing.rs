//! Test support: logging setup and sample product trees.

use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{Category, ProductType, TreeNode};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Vendor `V1` with product `P1` (versions `X`, `Y`) and vendor `V2` with
/// product `P2` (version `Z`). Ids equal names.
pub fn sample_tree() -> Vec<TreeNode> {
    vec![
        TreeNode::with_id("V1", Category::Vendor).named("V1").with_child(
            TreeNode::with_id("P1", Category::ProductName)
                .named("P1")
                .with_child(
                    TreeNode::with_id("X", Category::ProductVersion)
                        .named("X")
                        .with_product_type(ProductType::Software),
                )
                .with_child(
                    TreeNode::with_id("Y", Category::ProductVersion)
                        .named("Y")
                        .with_product_type(ProductType::Hardware),
                ),
        ),
        TreeNode::with_id("V2", Category::Vendor).named("V2").with_child(
            TreeNode::with_id("P2", Category::ProductName)
                .named("P2")
                .with_child(TreeNode::with_id("Z", Category::ProductVersion).named("Z")),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::navigator;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn given_sample_tree_then_seven_nodes() {
        assert_eq!(navigator::count(&sample_tree()), 7);
    }
}
