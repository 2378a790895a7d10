//! SurrealDB repository implementations.

mod indemnification;
mod job;
mod member;
mod ooi_information;
mod organization;

pub use indemnification::SurrealIndemnificationRepository;
pub use job::SurrealJobRepository;
pub use member::SurrealOrganizationMemberRepository;
pub use ooi_information::SurrealOoiInformationRepository;
pub use organization::SurrealOrganizationRepository;
