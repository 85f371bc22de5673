pub mod relationship {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod service;
    pub mod statistics;
    #[cfg(test)]
    pub mod repository_mem;
}
