mod config_loading;
mod inspector_lifecycle;
