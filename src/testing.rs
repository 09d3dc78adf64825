pub mod pipeline_contract;
