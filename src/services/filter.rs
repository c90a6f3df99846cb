//! Listing filters and pagination-by-slice.
//!
//! Backend list endpoints return whole collections; narrowing and paging
//! happen client-side in a single pass.

use serde::{Deserialize, Serialize};

use crate::models::{Influencer, Package, PagedResponse, PaginationMeta, PaginationParams};

/// `None`, empty and `"all"` mean "no constraint".
fn is_unconstrained(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(str::trim)
        .is_none_or(|v| v.is_empty() || v.eq_ignore_ascii_case("all"))
}

fn eq_constraint(constraint: &Option<String>, value: &str) -> bool {
    is_unconstrained(constraint)
        || constraint
            .as_deref()
            .is_some_and(|c| c.trim().eq_ignore_ascii_case(value.trim()))
}

/// Narrowing criteria for influencer listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluencerFilter {
    pub category: Option<String>,
    pub platform: Option<String>,
    pub min_followers: Option<u64>,
    pub max_price: Option<u64>,
    /// Case-insensitive substring of name or username; a leading `@` is ignored.
    pub search: Option<String>,
}

impl InfluencerFilter {
    pub fn matches(&self, influencer: &Influencer) -> bool {
        eq_constraint(&self.category, &influencer.category)
            && eq_constraint(&self.platform, &influencer.platform)
            && self
                .min_followers
                .is_none_or(|min| influencer.followers >= min)
            && self.max_price.is_none_or(|max| influencer.price <= max)
            && self.matches_search(influencer)
    }

    fn matches_search(&self, influencer: &Influencer) -> bool {
        let Some(query) = self.search.as_deref() else {
            return true;
        };
        let query = query.trim().trim_start_matches('@').to_lowercase();
        if query.is_empty() {
            return true;
        }
        influencer.name.to_lowercase().contains(&query)
            || influencer
                .username
                .trim_start_matches('@')
                .to_lowercase()
                .contains(&query)
    }

    /// Keep matching influencers, preserving order.
    pub fn apply(&self, influencers: Vec<Influencer>) -> Vec<Influencer> {
        influencers.into_iter().filter(|i| self.matches(i)).collect()
    }
}

/// Narrowing criteria for package listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFilter {
    pub category: Option<String>,
    pub max_price: Option<u64>,
}

impl PackageFilter {
    pub fn matches(&self, package: &Package) -> bool {
        eq_constraint(&self.category, &package.category)
            && self.max_price.is_none_or(|max| package.price <= max)
    }

    pub fn apply(&self, packages: Vec<Package>) -> Vec<Package> {
        packages.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Slice `items` into the requested page.
///
/// Parameters are normalized first; a page past the end yields no items but
/// still reports the totals.
pub fn paginate<T>(items: Vec<T>, params: PaginationParams) -> PagedResponse<T> {
    let params = params.normalize();
    let total_items = items.len();
    let page_size = params.page_size as usize;
    let total_pages = total_items.div_ceil(page_size);

    let data: Vec<T> = items
        .into_iter()
        .skip(params.offset())
        .take(page_size)
        .collect();

    PagedResponse {
        data,
        pagination: PaginationMeta {
            page: params.page,
            page_size: params.page_size,
            total_items: total_items as u64,
            total_pages: total_pages as u32,
            has_next: (params.page as usize) < total_pages,
            has_prev: params.page > 1,
        },
    }
}
