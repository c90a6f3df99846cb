mod influencer;
mod package;
mod pagination;
mod user;

pub use influencer::{Influencer, NewInfluencer, UpdateInfluencer};
pub use package::{NewPackage, Package, UpdatePackage};
pub use pagination::{PagedResponse, PaginationMeta, PaginationParams};
pub use user::{NewUser, UpdateProfile, UpdateUser, UserProfile};
