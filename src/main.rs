fn main() {
    farmwatch::run();
}
