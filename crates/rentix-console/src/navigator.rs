use rentix_client_core::{Navigator, Route};

/// Shows navigation by printing the screen that would be opened
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    visited: Vec<Route>,
}

impl ConsoleNavigator {
    pub fn visited(&self) -> &[Route] {
        &self.visited
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&mut self, route: Route) {
        println!("-> {route}");
        self.visited.push(route);
    }
}
