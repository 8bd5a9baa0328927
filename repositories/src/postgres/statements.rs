//! SQL used by the postgres repos. Statements are prepared through each pooled connection's
//! statement cache.

pub mod mappings {
    pub const GET: &str = "select id, tag_id, inspection_description, analyses_to_be_run \
        from analysis_mappings where id = $1";

    pub const GET_FOR_UPDATE: &str = "select id, tag_id, inspection_description, analyses_to_be_run \
        from analysis_mappings where id = $1 for update";

    pub const COUNT: &str = "select count(*) from analysis_mappings";

    pub const LIST: &str = "select id, tag_id, inspection_description, analyses_to_be_run \
        from analysis_mappings order by seq offset $1 limit $2";

    pub const CREATE: &str = "insert into analysis_mappings \
        (id, tag_id, inspection_description, analyses_to_be_run) values ($1, $2, $3, $4) \
        returning id, tag_id, inspection_description, analyses_to_be_run";

    pub const SET_ANALYSES: &str =
        "update analysis_mappings set analyses_to_be_run = $2 where id = $1";
}

pub mod inspections {
    macro_rules! columns {
        () => {
            "id, inspection_id, installation_code, \
            raw_storage_account, raw_blob_container, raw_blob_name, \
            anonymized_storage_account, anonymized_blob_container, anonymized_blob_name, \
            date_created, anonymizer_workflow_status, analyses"
        };
    }

    pub const GET: &str = concat!("select ", columns!(), " from inspection_data where id = $1");

    pub const GET_BY_INSPECTION_ID: &str = concat!(
        "select ",
        columns!(),
        " from inspection_data where inspection_id = $1"
    );

    pub const COUNT: &str = "select count(*) from inspection_data";

    pub const LIST: &str = concat!(
        "select ",
        columns!(),
        " from inspection_data order by seq offset $1 limit $2"
    );

    pub const INSERT: &str = concat!(
        "insert into inspection_data (id, inspection_id, installation_code, \
        raw_storage_account, raw_blob_container, raw_blob_name, \
        anonymized_storage_account, anonymized_blob_container, anonymized_blob_name, \
        anonymizer_workflow_status, analyses) \
        values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) returning ",
        columns!()
    );
}
