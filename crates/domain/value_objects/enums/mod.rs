pub mod plan_ids;
