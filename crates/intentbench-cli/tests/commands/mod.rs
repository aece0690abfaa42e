mod list_models_test;
mod list_prompts_test;
mod report_test;
mod run_test;
