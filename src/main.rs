fn main() -> glib::ExitCode {
    memory_puzzle::ui::app::run()
}
