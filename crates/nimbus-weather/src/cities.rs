//! Bundled world city list used when the remote city search is unavailable.

/// A city entry compiled into the binary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BundledCity {
    pub id: u64,
    pub name: &'static str,
    pub country: &'static str,
    pub country_code: &'static str,
    pub region: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

const fn city(
    id: u64,
    name: &'static str,
    country: &'static str,
    country_code: &'static str,
    region: &'static str,
    latitude: f64,
    longitude: f64,
) -> BundledCity {
    BundledCity {
        id,
        name,
        country,
        country_code,
        region,
        latitude,
        longitude,
    }
}

pub static WORLD_CITIES: &[BundledCity] = &[
    city(1, "Istanbul", "Turkey", "TR", "Marmara", 41.0082, 28.9784),
    city(2, "Ankara", "Turkey", "TR", "Central Anatolia", 39.9334, 32.8597),
    city(3, "Izmir", "Turkey", "TR", "Aegean", 38.4192, 27.1287),
    city(4, "Antalya", "Turkey", "TR", "Mediterranean", 36.8969, 30.7133),
    city(5, "Bursa", "Turkey", "TR", "Marmara", 40.1826, 29.0665),
    city(101, "New York", "United States", "US", "New York", 40.7128, -74.0060),
    city(102, "Los Angeles", "United States", "US", "California", 34.0522, -118.2437),
    city(103, "Chicago", "United States", "US", "Illinois", 41.8781, -87.6298),
    city(104, "Houston", "United States", "US", "Texas", 29.7604, -95.3698),
    city(105, "Phoenix", "United States", "US", "Arizona", 33.4484, -112.0740),
    city(106, "Philadelphia", "United States", "US", "Pennsylvania", 39.9526, -75.1652),
    city(107, "San Antonio", "United States", "US", "Texas", 29.4241, -98.4936),
    city(108, "San Diego", "United States", "US", "California", 32.7157, -117.1611),
    city(109, "Dallas", "United States", "US", "Texas", 32.7767, -96.7970),
    city(110, "San Jose", "United States", "US", "California", 37.3382, -121.8863),
    city(201, "London", "United Kingdom", "GB", "England", 51.5074, -0.1278),
    city(202, "Manchester", "United Kingdom", "GB", "England", 53.4808, -2.2426),
    city(203, "Birmingham", "United Kingdom", "GB", "England", 52.4862, -1.8904),
    city(204, "Liverpool", "United Kingdom", "GB", "England", 53.4084, -2.9916),
    city(205, "Edinburgh", "United Kingdom", "GB", "Scotland", 55.9533, -3.1883),
    city(301, "Berlin", "Germany", "DE", "Berlin", 52.5200, 13.4050),
    city(302, "Munich", "Germany", "DE", "Bavaria", 48.1351, 11.5820),
    city(303, "Hamburg", "Germany", "DE", "Hamburg", 53.5511, 9.9937),
    city(304, "Cologne", "Germany", "DE", "North Rhine-Westphalia", 50.9375, 6.9603),
    city(305, "Frankfurt", "Germany", "DE", "Hesse", 50.1109, 8.6821),
    city(401, "Paris", "France", "FR", "Île-de-France", 48.8566, 2.3522),
    city(402, "Marseille", "France", "FR", "Provence-Alpes-Côte d'Azur", 43.2965, 5.3698),
    city(403, "Lyon", "France", "FR", "Auvergne-Rhône-Alpes", 45.7640, 4.8357),
    city(404, "Nice", "France", "FR", "Provence-Alpes-Côte d'Azur", 43.7102, 7.2620),
    city(501, "Rome", "Italy", "IT", "Lazio", 41.9028, 12.4964),
    city(502, "Milan", "Italy", "IT", "Lombardy", 45.4642, 9.1900),
    city(503, "Naples", "Italy", "IT", "Campania", 40.8518, 14.2681),
    city(504, "Venice", "Italy", "IT", "Veneto", 45.4408, 12.3155),
    city(505, "Florence", "Italy", "IT", "Tuscany", 43.7696, 11.2558),
    city(601, "Madrid", "Spain", "ES", "Community of Madrid", 40.4168, -3.7038),
    city(602, "Barcelona", "Spain", "ES", "Catalonia", 41.3851, 2.1734),
    city(603, "Valencia", "Spain", "ES", "Valencian Community", 39.4699, -0.3763),
    city(604, "Seville", "Spain", "ES", "Andalusia", 37.3891, -5.9845),
    city(701, "Amsterdam", "Netherlands", "NL", "North Holland", 52.3676, 4.9041),
    city(702, "Rotterdam", "Netherlands", "NL", "South Holland", 51.9244, 4.4777),
    city(703, "The Hague", "Netherlands", "NL", "South Holland", 52.0705, 4.3007),
    city(801, "Tokyo", "Japan", "JP", "Kantō", 35.6762, 139.6503),
    city(802, "Osaka", "Japan", "JP", "Kansai", 34.6937, 135.5023),
    city(803, "Kyoto", "Japan", "JP", "Kansai", 35.0116, 135.7681),
    city(804, "Yokohama", "Japan", "JP", "Kantō", 35.4437, 139.6380),
    city(901, "Sydney", "Australia", "AU", "New South Wales", -33.8688, 151.2093),
    city(902, "Melbourne", "Australia", "AU", "Victoria", -37.8136, 144.9631),
    city(903, "Brisbane", "Australia", "AU", "Queensland", -27.4698, 153.0251),
    city(904, "Perth", "Australia", "AU", "Western Australia", -31.9505, 115.8605),
    city(1001, "Toronto", "Canada", "CA", "Ontario", 43.6532, -79.3832),
    city(1002, "Vancouver", "Canada", "CA", "British Columbia", 49.2827, -123.1207),
    city(1003, "Montreal", "Canada", "CA", "Quebec", 45.5017, -73.5673),
    city(1004, "Calgary", "Canada", "CA", "Alberta", 51.0447, -114.0719),
    city(1101, "Vienna", "Austria", "AT", "Vienna", 48.2082, 16.3738),
    city(1102, "Salzburg", "Austria", "AT", "Salzburg", 47.8095, 13.0550),
    city(1201, "Prague", "Czech Republic", "CZ", "Prague", 50.0755, 14.4378),
    city(1301, "Budapest", "Hungary", "HU", "Central Hungary", 47.4979, 19.0402),
    city(1401, "Warsaw", "Poland", "PL", "Masovian Voivodeship", 52.2297, 21.0122),
    city(1402, "Krakow", "Poland", "PL", "Lesser Poland Voivodeship", 50.0647, 19.9450),
    city(1501, "Stockholm", "Sweden", "SE", "Stockholm County", 59.3293, 18.0686),
    city(1502, "Gothenburg", "Sweden", "SE", "Västra Götaland County", 57.7089, 11.9746),
    city(1601, "Copenhagen", "Denmark", "DK", "Capital Region", 55.6761, 12.5683),
    city(1701, "Oslo", "Norway", "NO", "Oslo", 59.9139, 10.7522),
    city(1801, "Helsinki", "Finland", "FI", "Uusimaa", 60.1699, 24.9384),
    city(1901, "Dublin", "Ireland", "IE", "Leinster", 53.3498, -6.2603),
    city(2001, "Lisbon", "Portugal", "PT", "Lisbon", 38.7223, -9.1393),
    city(2002, "Porto", "Portugal", "PT", "Norte", 41.1579, -8.6291),
    city(2101, "Zurich", "Switzerland", "CH", "Zurich", 47.3769, 8.5417),
    city(2102, "Geneva", "Switzerland", "CH", "Geneva", 46.2044, 6.1432),
    city(2201, "Brussels", "Belgium", "BE", "Brussels-Capital", 50.8503, 4.3517),
    city(2202, "Antwerp", "Belgium", "BE", "Flanders", 51.2194, 4.4025),
    city(2301, "Athens", "Greece", "GR", "Attica", 37.9838, 23.7275),
    city(2401, "Moscow", "Russia", "RU", "Central Federal District", 55.7558, 37.6173),
    city(2402, "Saint Petersburg", "Russia", "RU", "Northwestern Federal District", 59.9311, 30.3609),
    city(2501, "São Paulo", "Brazil", "BR", "Southeast", -23.5505, -46.6333),
    city(2502, "Rio de Janeiro", "Brazil", "BR", "Southeast", -22.9068, -43.1729),
    city(2601, "Buenos Aires", "Argentina", "AR", "Buenos Aires Province", -34.6118, -58.3960),
    city(2701, "Mexico City", "Mexico", "MX", "Mexico City", 19.4326, -99.1332),
    city(2801, "Seoul", "South Korea", "KR", "Seoul", 37.5665, 126.9780),
    city(2802, "Busan", "South Korea", "KR", "South Gyeongsang", 35.1796, 129.0756),
    city(2901, "Beijing", "China", "CN", "Beijing", 39.9042, 116.4074),
    city(2902, "Shanghai", "China", "CN", "Shanghai", 31.2304, 121.4737),
    city(2903, "Guangzhou", "China", "CN", "Guangdong", 23.1291, 113.2644),
    city(3001, "Mumbai", "India", "IN", "Maharashtra", 19.0760, 72.8777),
    city(3002, "Delhi", "India", "IN", "Delhi", 28.7041, 77.1025),
    city(3003, "Bangalore", "India", "IN", "Karnataka", 12.9716, 77.5946),
    city(3101, "Bangkok", "Thailand", "TH", "Bangkok", 13.7563, 100.5018),
    city(3201, "Singapore", "Singapore", "SG", "Singapore", 1.3521, 103.8198),
    city(3301, "Kuala Lumpur", "Malaysia", "MY", "Kuala Lumpur", 3.1390, 101.6869),
    city(3401, "Jakarta", "Indonesia", "ID", "Jakarta", -6.2088, 106.8456),
    city(3501, "Manila", "Philippines", "PH", "National Capital Region", 14.5995, 120.9842),
    city(3601, "Ho Chi Minh City", "Vietnam", "VN", "Southeast", 10.8231, 106.6297),
    city(3602, "Hanoi", "Vietnam", "VN", "Red River Delta", 21.0285, 105.8542),
    city(3701, "Cape Town", "South Africa", "ZA", "Western Cape", -33.9249, 18.4241),
    city(3702, "Johannesburg", "South Africa", "ZA", "Gauteng", -26.2041, 28.0473),
    city(3801, "Cairo", "Egypt", "EG", "Cairo Governorate", 30.0444, 31.2357),
    city(3901, "Casablanca", "Morocco", "MA", "Casablanca-Settat", 33.5731, -7.5898),
    city(4001, "Tel Aviv", "Israel", "IL", "Tel Aviv District", 32.0853, 34.7818),
    city(4002, "Jerusalem", "Israel", "IL", "Jerusalem District", 31.7683, 35.2137),
    city(4101, "Dubai", "United Arab Emirates", "AE", "Dubai", 25.2048, 55.2708),
    city(4102, "Abu Dhabi", "United Arab Emirates", "AE", "Abu Dhabi", 24.2532, 54.3665),
    city(4201, "Doha", "Qatar", "QA", "Doha", 25.2760, 51.5200),
    city(4301, "Riyadh", "Saudi Arabia", "SA", "Riyadh Province", 24.7136, 46.6753),
    city(4302, "Jeddah", "Saudi Arabia", "SA", "Makkah Province", 21.4858, 39.1925),
];
