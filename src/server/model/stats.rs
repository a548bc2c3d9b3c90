use crate::model::admin::StatsDto;

/// Instance-wide totals shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub users: u64,
    pub images: u64,
    /// Bytes held by live images.
    pub storage_used: i64,
}

impl Stats {
    pub fn into_dto(self) -> StatsDto {
        StatsDto {
            users: self.users,
            images: self.images,
            storage_used: self.storage_used,
        }
    }
}
