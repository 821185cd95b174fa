fn main() {
    scriptkit::app::cli::run();
}
