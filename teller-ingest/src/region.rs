//! Anchor-based page regions for narrative statements.
//!
//! Both scans start from the full page and narrow it only for anchors that
//! are actually present; a missing anchor is not an error.

use crate::layout::{BBox, LayoutPage};

pub const TRANSACTION_ANCHOR: &str = "TRANSACTION";
pub const AMOUNT_ANCHOR: &str = "AMOUNT($)";
pub const BALANCE_ANCHOR: &str = "CALCULATINGYOURBALANCE";
pub const NEW_BALANCE_ANCHOR: &str = "NEWBALANCE";

/// Box holding the transaction list: from the `TRANSACTION` column header
/// on the left to the `AMOUNT($)` header on the right, below that header.
pub fn transaction_region<P: LayoutPage + ?Sized>(page: &P) -> BBox {
    let mut bbox = BBox::page(page.width(), page.height());
    let mut found = (false, false);

    for word in page.words() {
        if word.text == TRANSACTION_ANCHOR {
            bbox.x0 = word.x0;
            found.0 = true;
        }
        if word.text == AMOUNT_ANCHOR {
            bbox.x1 = word.x1;
            bbox.top = word.bottom;
            found.1 = true;
        }
    }

    if !found.0 || !found.1 {
        tracing::debug!(
            transaction = found.0,
            amount = found.1,
            "transaction region anchors missing, using page defaults"
        );
    }
    bbox
}

/// Box holding the balance summary: from the `CALCULATING YOUR BALANCE`
/// label down to the top of `NEW BALANCE`.
pub fn balance_region<P: LayoutPage + ?Sized>(page: &P) -> BBox {
    let mut bbox = BBox::page(page.width(), page.height());
    let mut found = (false, false);

    for word in page.words() {
        let squashed = squash(&word.text);
        if squashed == BALANCE_ANCHOR {
            bbox.x0 = word.x0;
            bbox.top = word.top;
            found.0 = true;
        }
        if squashed == NEW_BALANCE_ANCHOR {
            bbox.bottom = word.top;
            found.1 = true;
        }
    }

    if !found.0 || !found.1 {
        tracing::debug!(
            label = found.0,
            new_balance = found.1,
            "balance region anchors missing, using page defaults"
        );
    }
    bbox
}

fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
